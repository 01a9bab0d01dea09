//! Minimal Telegram Bot API client: long-polling for updates and sending MarkdownV2 replies.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::util::env::Env;

/// Outbound half of the chat transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `markdown` to `chat_id` as a reply to `reply_to`.
    async fn reply(&self, chat_id: i64, reply_to: i64, markdown: &str) -> TelegramResult<()>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
struct GetUpdates<'a> {
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    reply_parameters: ReplyParameters,
}

#[derive(Debug, Serialize)]
struct ReplyParameters {
    message_id: i64,
    allow_sending_without_reply: bool,
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    pub fn from_env(env: &Env) -> Self {
        Self::new(&env.telegram_api_url, &env.bot_token)
    }

    /// Long-polls for new messages. `offset` is one past the last update already handled.
    #[instrument(skip(self))]
    pub async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> TelegramResult<Vec<Update>> {
        let body = GetUpdates {
            offset,
            timeout,
            allowed_updates: &["message"],
        };

        // the HTTP request has to outlive the server-side long poll
        self.call("getUpdates", &body, Duration::from_secs(timeout + 10))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_me(&self) -> TelegramResult<User> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT).await
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn send_message(&self, chat_id: i64, text: &str, reply_to: i64) -> TelegramResult<Message> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "MarkdownV2",
            reply_parameters: ReplyParameters {
                message_id: reply_to,
                allow_sending_without_reply: true,
            },
        };

        self.call("sendMessage", &body, REQUEST_TIMEOUT).await
    }

    async fn call<B, T>(&self, api_method: &str, body: &B, timeout: Duration) -> TelegramResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(format!("{}/{}", self.base_url, api_method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = res.status();
        let parsed = res.json::<ApiResponse<T>>().await?;

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { ok: true, .. } => Err(TelegramError::EmptyResult(api_method.to_string())),
            ApiResponse {
                description,
                error_code,
                ..
            } => {
                tracing::error!(code = %status, api_method, ?description, "telegram api error");
                Err(TelegramError::Api {
                    code: error_code.unwrap_or(status.as_u16() as i64),
                    description: description.unwrap_or_default(),
                })
            }
        }
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn reply(&self, chat_id: i64, reply_to: i64, markdown: &str) -> TelegramResult<()> {
        self.send_message(chat_id, markdown, reply_to).await?;
        Ok(())
    }
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub type TelegramResult<T> = core::result::Result<T, TelegramError>;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("telegram returned ok without a result for '{0}'")]
    EmptyResult(String),
}
