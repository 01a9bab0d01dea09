use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;

use crate::db::models::MatchRecord;

/// Entries kept per ranking
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Smallest values first
    #[default]
    Ascending,
    /// Largest values first
    Descending,
}

impl RankOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            RankOrder::Ascending => ord,
            RankOrder::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorTotals {
    pub author: String,
    pub total_count: usize,
    pub mean_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub by_size: Vec<AuthorTotals>,
    pub by_count: Vec<AuthorTotals>,
}

impl Leaderboard {
    pub fn compute(records: &[MatchRecord], order: RankOrder) -> Self {
        let totals = per_author(records);

        let mut by_size = totals.clone();
        by_size.sort_by(|a, b| {
            order.apply(a.mean_size.partial_cmp(&b.mean_size).unwrap_or(Ordering::Equal))
        });
        by_size.truncate(LEADERBOARD_SIZE);

        let mut by_count = totals;
        by_count.sort_by(|a, b| order.apply(a.total_count.cmp(&b.total_count)));
        by_count.truncate(LEADERBOARD_SIZE);

        Self { by_size, by_count }
    }
}

/// Totals per author, in order of each author's first appearance in `records`
fn per_author(records: &[MatchRecord]) -> Vec<AuthorTotals> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(&str, usize, i64)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.author.as_str()).or_insert_with(|| {
            sums.push((record.author.as_str(), 0, 0));
            sums.len() - 1
        });

        sums[slot].1 += 1;
        sums[slot].2 += record.total_length;
    }

    sums.into_iter()
        .map(|(author, count, size_sum)| AuthorTotals {
            author: author.to_string(),
            total_count: count,
            mean_size: size_sum as f64 / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use super::*;

    fn record(author: &str, len: i64) -> MatchRecord {
        MatchRecord {
            id: Uuid::now_v7(),
            total_length: len,
            primary_char_count: 1,
            secondary_char_count: len - 1,
            author: author.to_string(),
            scope: "chat".into(),
        }
    }

    fn names(entries: &[AuthorTotals]) -> Vec<&str> {
        entries.iter().map(|e| e.author.as_str()).collect()
    }

    #[test]
    fn test_mean_size_ascending() {
        let records = vec![record("B", 10), record("A", 4), record("A", 2)];
        let board = Leaderboard::compute(&records, RankOrder::Ascending);

        assert_eq!(names(&board.by_size), vec!["A", "B"]);
        assert_eq!(format!("{:.2}", board.by_size[0].mean_size), "3.00");
        assert_eq!(format!("{:.2}", board.by_size[1].mean_size), "10.00");

        assert_eq!(names(&board.by_count), vec!["B", "A"]);
        assert_eq!(board.by_count[1].total_count, 2);
    }

    #[test]
    fn test_descending() {
        let records = vec![record("B", 10), record("A", 4), record("A", 2)];
        let board = Leaderboard::compute(&records, RankOrder::Descending);

        assert_eq!(names(&board.by_size), vec!["B", "A"]);
        assert_eq!(names(&board.by_count), vec!["A", "B"]);
    }

    #[test]
    fn test_truncates_to_five() {
        let records: Vec<MatchRecord> = (1..=8)
            .map(|i| record(&format!("user{i}"), i + 1))
            .collect();
        let board = Leaderboard::compute(&records, RankOrder::Ascending);

        assert_eq!(board.by_size.len(), LEADERBOARD_SIZE);
        assert_eq!(board.by_count.len(), LEADERBOARD_SIZE);
        assert_eq!(
            names(&board.by_size),
            vec!["user1", "user2", "user3", "user4", "user5"]
        );
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let records = vec![record("c", 3), record("a", 3), record("b", 3)];
        let board = Leaderboard::compute(&records, RankOrder::Ascending);

        assert_eq!(names(&board.by_size), vec!["c", "a", "b"]);
        assert_eq!(names(&board.by_count), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty() {
        let board = Leaderboard::compute(&[], RankOrder::Ascending);

        assert!(board.by_size.is_empty());
        assert!(board.by_count.is_empty());
    }
}
