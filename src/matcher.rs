//! Finds "уа"s in message text: one or more `у` followed by one or more `а`, in any case.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::db::models::{MatchRecord, ScopeId};

pub const PRIMARY_CHAR: char = 'у';
pub const SECONDARY_CHAR: char = 'а';

static WUA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){PRIMARY_CHAR}+{SECONDARY_CHAR}+"))
        .expect("static wua pattern is valid")
});

/// Every non-overlapping match in `text`, in scan order, as an unsaved record.
///
/// An empty result means the message has nothing to react to.
pub fn scan(text: &str, author: &str, scope: &ScopeId) -> Vec<MatchRecord> {
    WUA_PATTERN
        .find_iter(text)
        .map(|m| score(m.as_str(), author, scope))
        .collect()
}

/// The longest candidate; on equal lengths the earliest one wins.
pub fn longest(candidates: Vec<MatchRecord>) -> Option<MatchRecord> {
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.total_length > best.total_length {
            candidate
        } else {
            best
        }
    })
}

fn score(matched: &str, author: &str, scope: &ScopeId) -> MatchRecord {
    let lowered = matched.to_lowercase();
    let count = |needle: char| lowered.chars().filter(|c| *c == needle).count() as i64;

    MatchRecord {
        id: Uuid::now_v7(),
        total_length: matched.chars().count() as i64,
        primary_char_count: count(PRIMARY_CHAR),
        secondary_char_count: count(SECONDARY_CHAR),
        author: author.to_string(),
        scope: scope.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scope() -> ScopeId {
        "-1001".into()
    }

    fn lengths(records: &[MatchRecord]) -> Vec<i64> {
        records.iter().map(|r| r.total_length).collect()
    }

    #[test]
    fn test_mixed_case_sequence() {
        let found = scan("УААААуааааУа.", "alice", &scope());

        assert_eq!(lengths(&found), vec![5, 5, 2]);
        assert_eq!(found[0].primary_char_count, 1);
        assert_eq!(found[0].secondary_char_count, 4);
        assert!(found.iter().all(|r| r.author == "alice" && r.scope == scope()));

        let first_id = found[0].id;
        let best = longest(found).unwrap();
        assert_eq!(best.id, first_id);
    }

    #[test]
    fn test_counts_cover_whole_match() {
        let inputs = [
            "ууууа",
            "УУУААА и ещё уа",
            "уАаАаАаА",
            "ya ua уa (latin a) уу аа",
            "ааа ууу",
        ];

        for input in inputs {
            for rec in scan(input, "bob", &scope()) {
                assert!(rec.total_length >= 1, "{input}");
                assert_eq!(
                    rec.primary_char_count + rec.secondary_char_count,
                    rec.total_length,
                    "{input}"
                );
            }
        }
    }

    #[test]
    fn test_requires_both_letters_in_order() {
        assert!(scan("ааа ууу", "bob", &scope()).is_empty());
        assert!(scan("hello there", "bob", &scope()).is_empty());
        assert!(scan("", "bob", &scope()).is_empty());

        // latin look-alikes don't count
        assert!(scan("ya", "bob", &scope()).is_empty());
    }

    #[test]
    fn test_greedy_runs() {
        let found = scan("ууууаа!", "bob", &scope());

        assert_eq!(lengths(&found), vec![6]);
        assert_eq!(found[0].primary_char_count, 4);
        assert_eq!(found[0].secondary_char_count, 2);
    }

    #[test]
    fn test_longest_prefers_strictly_longer() {
        let found = scan("уа уааа уаа уааа", "bob", &scope());
        assert_eq!(lengths(&found), vec![2, 4, 3, 4]);

        let second_id = found[1].id;
        assert_eq!(longest(found).unwrap().id, second_id);
    }

    #[test]
    fn test_longest_of_nothing() {
        assert!(longest(Vec::new()).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let found = scan("уа уа уа уа", "bob", &scope());
        let mut ids: Vec<_> = found.iter().map(|r| r.id).collect();
        ids.dedup();

        assert_eq!(ids.len(), 4);
    }
}
