use crate::db::models::MatchRecord;

/// Descriptive statistics over every record in a chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSummary {
    pub count: usize,
    pub mean_length: f64,
    pub mean_primary_ratio_pct: f64,
    pub mean_secondary_ratio_pct: f64,

    /// Requesting author's longest record, if they have any
    pub author_top: Option<MatchRecord>,
}

impl ChatSummary {
    /// `records` must already be in descending-size order (as returned by the store).
    ///
    /// Returns `None` for a chat with no records.
    pub fn compute(records: &[MatchRecord], author: &str) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let count = records.len();
        let n = count as f64;

        let (length_sum, primary_sum, secondary_sum) =
            records.iter().fold((0i64, 0f64, 0f64), |(len, p, s), r| {
                (
                    len + r.total_length,
                    p + r.ratio_pct(r.primary_char_count),
                    s + r.ratio_pct(r.secondary_char_count),
                )
            });

        Some(Self {
            count,
            mean_length: length_sum as f64 / n,
            mean_primary_ratio_pct: primary_sum / n,
            mean_secondary_ratio_pct: secondary_sum / n,
            author_top: records.iter().find(|r| r.author == author).cloned(),
        })
    }
}
