//! In-process `RecordStore` used by the test suite.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::{MatchRecord, ScopeId};
use crate::db::repository::RecordStore;
use crate::db::{DbError, DbResult};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<MatchRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, record: &MatchRecord) -> DbResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(DbError::Duplicate(record.id));
        }

        records.push(record.clone());
        Ok(())
    }

    async fn get_all_in_scope(
        &self,
        scope: &ScopeId,
        author: Option<&str>,
    ) -> DbResult<Vec<MatchRecord>> {
        let mut found: Vec<MatchRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &r.scope == scope && author.is_none_or(|a| r.author == a))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.total_length
                .cmp(&a.total_length)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(found)
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use super::*;

    fn record(scope: &str, author: &str, len: i64) -> MatchRecord {
        MatchRecord {
            id: Uuid::now_v7(),
            total_length: len,
            primary_char_count: 1,
            secondary_char_count: len - 1,
            author: author.to_string(),
            scope: scope.into(),
        }
    }

    #[tokio::test]
    async fn test_round_trip_keeps_every_field() {
        let store = MemoryRecordStore::new();
        let rec = MatchRecord {
            id: Uuid::now_v7(),
            total_length: 7,
            primary_char_count: 3,
            secondary_char_count: 4,
            author: "анонимус".to_string(),
            scope: "-100200".into(),
        };

        store.put(&rec).await.unwrap();

        let got = store.get_all_in_scope(&rec.scope, None).await.unwrap();
        assert_eq!(got, vec![rec]);
    }

    #[tokio::test]
    async fn test_sorted_non_increasing_and_scoped() {
        let store = MemoryRecordStore::new();
        for (scope, author, len) in [
            ("a", "x", 3),
            ("a", "y", 9),
            ("b", "x", 100),
            ("a", "x", 5),
            ("a", "y", 1),
        ] {
            store.put(&record(scope, author, len)).await.unwrap();
        }

        let all = store.get_all_in_scope(&"a".into(), None).await.unwrap();
        let lengths: Vec<i64> = all.iter().map(|r| r.total_length).collect();
        assert_eq!(lengths, vec![9, 5, 3, 1]);
        assert!(all.windows(2).all(|w| w[0].total_length >= w[1].total_length));

        let by_x = store.get_all_in_scope(&"a".into(), Some("x")).await.unwrap();
        assert!(by_x.iter().all(|r| r.author == "x"));
        assert_eq!(by_x.len(), 2);

        assert!(store.get_all_in_scope(&"c".into(), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = MemoryRecordStore::new();
        let first = record("a", "x", 4);
        let second = record("a", "y", 4);
        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();

        let all = store.get_all_in_scope(&"a".into(), None).await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let store = MemoryRecordStore::new();
        for len in [2, 2, 7, 3, 2] {
            store.put(&record("a", "x", len)).await.unwrap();
        }

        let first = store.get_all_in_scope(&"a".into(), None).await.unwrap();
        let second = store.get_all_in_scope(&"a".into(), None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryRecordStore::new();
        let rec = record("a", "x", 2);
        store.put(&rec).await.unwrap();

        let err = store.put(&rec).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(id) if id == rec.id));
    }
}
