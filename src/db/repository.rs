use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::db::models::{MatchRecord, ScopeId};
use crate::db::{DbError, DbResult};

/// Insert-only storage for match records.
///
/// Reads always come back ordered by `total_length` descending; equal lengths are ordered by
/// id, which for v7 ids is creation order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts exactly one record. Fails if the id is already taken.
    async fn put(&self, record: &MatchRecord) -> DbResult<()>;

    /// Every record in `scope`, optionally only those by `author`. An empty scope is `Ok(vec![])`.
    async fn get_all_in_scope(
        &self,
        scope: &ScopeId,
        author: Option<&str>,
    ) -> DbResult<Vec<MatchRecord>>;
}

#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[instrument(skip(self, record), fields(id = %record.id, scope = %record.scope))]
    async fn put(&self, record: &MatchRecord) -> DbResult<()> {
        let res = sqlx::query(
            r#"
            INSERT INTO match_record (
                id,
                total_length,
                primary_char_count,
                secondary_char_count,
                author,
                scope
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.total_length)
        .bind(record.primary_char_count)
        .bind(record.secondary_char_count)
        .bind(&record.author)
        .bind(&record.scope)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::error!(error = ?e, "duplicate record id");
                Err(DbError::Duplicate(record.id))
            }
            Err(e) => {
                tracing::error!(error = ?e, "failure during record insertion");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_all_in_scope(
        &self,
        scope: &ScopeId,
        author: Option<&str>,
    ) -> DbResult<Vec<MatchRecord>> {
        let records = sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT
                id,
                total_length,
                primary_char_count,
                secondary_char_count,
                author,
                scope
            FROM match_record
            WHERE scope = $1
            AND ($2::TEXT IS NULL OR author = $2)
            ORDER BY total_length DESC, id ASC
            "#,
        )
        .bind(scope)
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = records.len(), "fetched scope records");
        Ok(records)
    }
}
