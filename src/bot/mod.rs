use thiserror::Error;
use tinyrand::{Rand, RandRange, Seeded, StdRand};
use tinyrand_std::ClockSeed;

use crate::bot::telegram::{Message, TelegramError};
use crate::db::models::{ANONYMOUS_AUTHOR, ScopeId};
use crate::db::DbError;

pub mod format;
pub mod handler;
pub mod runner;
pub mod telegram;

/// Celebratory replies, one picked at random per reaction
pub const WUA_PHRASES: [&str; 8] = [
    "УАААААА",
    "уааааа",
    "Уа.",
    "уаа уаа...",
    "уааа?",
    "УА!",
    "уууууаааааааааааа",
    "уАаАаАаА",
];

/// Uniform index in `0..max`
pub fn idx(max: usize) -> usize {
    let seed = ClockSeed::default().next_u64();
    let mut rng = StdRand::seed(seed);

    rng.next_range(0..max)
}

pub fn random_phrase() -> &'static str {
    WUA_PHRASES[idx(WUA_PHRASES.len())]
}

/// A text message as the handlers see it
#[derive(Debug, Clone, PartialEq)]
pub struct Incoming {
    pub chat_id: i64,
    pub message_id: i64,
    pub author: String,
    pub text: String,
}

impl Incoming {
    /// `None` for messages without text (stickers, photos, service messages)
    pub fn from_message(msg: &Message) -> Option<Self> {
        let text = msg.text.clone()?;
        let author = msg
            .from
            .as_ref()
            .and_then(|user| user.username.clone())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());

        Some(Self {
            chat_id: msg.chat.id,
            message_id: msg.message_id,
            author,
            text,
        })
    }

    pub fn scope(&self) -> ScopeId {
        self.chat_id.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// `/wua_stats`
    Stats,
    /// `/top_wua`
    Top,
}

impl BotCommand {
    /// Recognises `/command` and `/command@bot_username` (only when addressed to us). Anything
    /// after the command word is ignored.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let (name, target) = match word.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (word, None),
        };

        if let (Some(target), Some(me)) = (target, bot_username)
            && !target.eq_ignore_ascii_case(me)
        {
            return None;
        }

        match name {
            "wua_stats" => Some(BotCommand::Stats),
            "top_wua" => Some(BotCommand::Top),
            _ => None,
        }
    }
}

pub type BotResult<T> = core::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),
}
