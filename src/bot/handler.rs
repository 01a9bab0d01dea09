use std::sync::Arc;

use tracing::instrument;

use crate::bot::format::{bold, escape, italic, marked_section, numbered_section, section};
use crate::bot::telegram::Transport;
use crate::bot::{BotCommand, BotResult, Incoming, random_phrase};
use crate::db::models::MatchRecord;
use crate::db::repository::RecordStore;
use crate::matcher;
use crate::stats::{ChatSummary, Leaderboard, RankOrder};

/// Chat-wide ranks at or above this get a line in the reply
const CHAT_RANK_SHOWN: usize = 5;
/// Same, for the author's own records
const AUTHOR_RANK_SHOWN: usize = 3;

/// Outcome of reacting to a message that contained at least one wua
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub record: MatchRecord,
    pub phrase: &'static str,
    /// 1-based position among every record in the chat
    pub chat_position: Option<usize>,
    /// 1-based position among the author's records in the chat
    pub my_position: Option<usize>,
}

impl Reaction {
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if let Some(pos) = self.chat_position.filter(|p| *p <= CHAT_RANK_SHOWN) {
            lines.push(format!(
                "{}{}{}",
                escape("Этот уаа занимает "),
                bold(&format!("{pos} место ")),
                escape("среди всех уаа в этом чате!"),
            ));
        }

        if let Some(pos) = self.my_position.filter(|p| *p <= AUTHOR_RANK_SHOWN) {
            lines.push(format!(
                "{}{}{}",
                escape("Этот уаа занимает "),
                bold(&format!("{pos} место ")),
                escape("среди твоих уаа в этом чате!"),
            ));
        }

        section(&bold(self.phrase), lines)
    }
}

/// Positions of `record` in the chat-wide list and in its author's sub-list. `records` must
/// be in the store's descending-size order.
pub fn positions(records: &[MatchRecord], record: &MatchRecord) -> (Option<usize>, Option<usize>) {
    let chat_position = records
        .iter()
        .position(|r| r.id == record.id)
        .map(|i| i + 1);

    let my_position = records
        .iter()
        .filter(|r| r.author == record.author)
        .position(|r| r.id == record.id)
        .map(|i| i + 1);

    (chat_position, my_position)
}

pub fn render_summary(summary: Option<&ChatSummary>) -> String {
    let Some(summary) = summary else {
        return bold("В этом чате ещё не было ни одного УААА");
    };

    let mut stats = vec![
        format!("Всего УААА было в этом чате: {}", summary.count),
        format!("Средний размер УААА в этом чате: {:.2}", summary.mean_length),
        format!("Средняя доля У в УААА: {:.2}%", summary.mean_primary_ratio_pct),
        format!("Средняя доля ААА в УААА: {:.2}%", summary.mean_secondary_ratio_pct),
    ];

    if let Some(top) = &summary.author_top {
        stats.push(format!("Твой самый длинный УААА имеет размер {}", top.total_length));
    }

    marked_section(
        &bold("УААА статистики этого чата:"),
        stats.iter().map(|line| escape(line)),
    )
}

pub fn render_leaderboard(board: &Leaderboard) -> String {
    let entry = |author: &str, value: String| {
        format!("{}{}", escape(&format!("{author} - ")), italic(&value))
    };

    let size_lines = board
        .by_size
        .iter()
        .map(|e| entry(&e.author, format!("{:.2}", e.mean_size)));

    let count_lines = board
        .by_count
        .iter()
        .map(|e| entry(&e.author, e.total_count.to_string()));

    let divider = escape("------");

    section(
        &bold("УААА рейтинг этого чата"),
        [
            divider.clone(),
            numbered_section(
                &escape(&format!(
                    "Топ {} юзеров по среднему размеру УААА:",
                    board.by_size.len()
                )),
                size_lines,
            ),
            divider,
            numbered_section(
                &escape(&format!(
                    "Топ {} юзеров по количеству УААА:",
                    board.by_count.len()
                )),
                count_lines,
            ),
        ],
    )
}

#[derive(Clone)]
pub struct Handler {
    store: Arc<dyn RecordStore>,
    transport: Arc<dyn Transport>,
    bot_username: Option<String>,
    leaderboard_order: RankOrder,
}

impl Handler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn Transport>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            store,
            transport,
            bot_username,
            leaderboard_order: RankOrder::default(),
        }
    }

    pub fn with_leaderboard_order(mut self, order: RankOrder) -> Self {
        self.leaderboard_order = order;
        self
    }

    /// Routes a message to a command or, failing that, to the wua reaction.
    #[instrument(skip(self, msg), fields(chat = msg.chat_id, message = msg.message_id))]
    pub async fn dispatch(&self, msg: &Incoming) -> BotResult<()> {
        match BotCommand::parse(&msg.text, self.bot_username.as_deref()) {
            Some(BotCommand::Stats) => {
                self.wua_stats(msg).await?;
            }
            Some(BotCommand::Top) => {
                self.top_wua(msg).await?;
            }
            None => {
                self.react(msg).await?;
            }
        }

        Ok(())
    }

    /// Stores the longest wua in `msg` and replies with its ranks. Does nothing (and sends
    /// nothing) when the message has no wua.
    #[instrument(skip(self, msg), fields(author = %msg.author))]
    pub async fn react(&self, msg: &Incoming) -> BotResult<Option<Reaction>> {
        let scope = msg.scope();
        let candidates = matcher::scan(&msg.text, &msg.author, &scope);
        let Some(record) = matcher::longest(candidates) else {
            return Ok(None);
        };

        self.store.put(&record).await?;
        let chat_records = self.store.get_all_in_scope(&scope, None).await?;
        let (chat_position, my_position) = positions(&chat_records, &record);

        if chat_position.is_none() {
            tracing::warn!(id = %record.id, "stored record missing from its scope");
        }

        let reaction = Reaction {
            record,
            phrase: random_phrase(),
            chat_position,
            my_position,
        };

        tracing::info!(
            size = reaction.record.total_length,
            chat_position = ?reaction.chat_position,
            my_position = ?reaction.my_position,
            "wua recorded"
        );

        self.transport
            .reply(msg.chat_id, msg.message_id, &reaction.render())
            .await?;

        Ok(Some(reaction))
    }

    #[instrument(skip(self, msg))]
    pub async fn wua_stats(&self, msg: &Incoming) -> BotResult<String> {
        let records = self.store.get_all_in_scope(&msg.scope(), None).await?;
        let summary = ChatSummary::compute(&records, &msg.author);
        let text = render_summary(summary.as_ref());

        self.transport
            .reply(msg.chat_id, msg.message_id, &text)
            .await?;

        Ok(text)
    }

    #[instrument(skip(self, msg))]
    pub async fn top_wua(&self, msg: &Incoming) -> BotResult<String> {
        let records = self.store.get_all_in_scope(&msg.scope(), None).await?;
        let board = Leaderboard::compute(&records, self.leaderboard_order);
        let text = render_leaderboard(&board);

        self.transport
            .reply(msg.chat_id, msg.message_id, &text)
            .await?;

        Ok(text)
    }
}
