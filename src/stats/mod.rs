//! Views derived on demand from a chat's records. Nothing here is persisted.

pub mod leaderboard;
pub mod summary;

pub use leaderboard::{Leaderboard, RankOrder};
pub use summary::ChatSummary;
