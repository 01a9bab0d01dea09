use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::bot::handler::Handler;
use crate::bot::telegram::{TelegramClient, TelegramResult};
use crate::bot::Incoming;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polling loop. Each message is handled on its own task, so a slow or failing reaction
/// never holds up the next update.
#[derive(Clone)]
pub struct Poller {
    client: Arc<TelegramClient>,
    handler: Handler,
    timeout: u64,
    offset: Option<i64>,
}

impl Poller {
    pub fn new(client: Arc<TelegramClient>, handler: Handler, timeout: u64) -> Self {
        Self {
            client,
            handler,
            timeout,
            offset: None,
        }
    }

    /// Fetches one batch of updates and spawns a handler task per text message.
    #[instrument(skip(self), fields(offset = ?self.offset))]
    pub async fn poll_once(&mut self) -> TelegramResult<Vec<JoinHandle<()>>> {
        let updates = self.client.get_updates(self.offset, self.timeout).await?;
        let mut handles = Vec::with_capacity(updates.len());

        for update in updates {
            self.offset = Some(update.update_id + 1);

            let Some(incoming) = update.message.as_ref().and_then(Incoming::from_message) else {
                tracing::trace!(update_id = update.update_id, "skipping non-text update");
                continue;
            };

            let handler = self.handler.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = handler.dispatch(&incoming).await {
                    tracing::error!(
                        error = ?e,
                        chat = incoming.chat_id,
                        message = incoming.message_id,
                        "message handling failed"
                    );
                }
            }));
        }

        Ok(handles)
    }

    /// Polls until ctrl-c. Transport errors are logged and retried after a short delay.
    pub async fn run(mut self) {
        tracing::info!(timeout = self.timeout, "polling for updates");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown requested");
                    break;
                }

                res = self.poll_once() => {
                    if let Err(e) = res {
                        tracing::error!(error = ?e, "update polling failure");
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }
    }
}
