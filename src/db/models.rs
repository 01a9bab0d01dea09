use core::fmt;

use uuid::Uuid;

/// Author recorded for messages without a known sender username.
pub const ANONYMOUS_AUTHOR: &str = "анонимус";

/// Chat a record was matched in
#[derive(Debug, Clone, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct ScopeId(pub String);

/// One scored match, persisted per reply event. Insert-only.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MatchRecord {
    pub id: Uuid,
    pub total_length: i64,
    pub primary_char_count: i64,
    pub secondary_char_count: i64,
    pub author: String,
    pub scope: ScopeId,
}

impl MatchRecord {
    /// Share of the match taken up by `count`, as a percentage of its length
    pub fn ratio_pct(&self, count: i64) -> f64 {
        count as f64 / self.total_length as f64 * 100.0
    }
}

impl From<String> for ScopeId {
    fn from(value: String) -> Self {
        ScopeId(value)
    }
}

impl From<&str> for ScopeId {
    fn from(value: &str) -> Self {
        ScopeId(value.to_string())
    }
}

impl From<i64> for ScopeId {
    fn from(value: i64) -> Self {
        ScopeId(value.to_string())
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
