use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::instrument;

use crate::util::env::Env;

#[cfg(test)]
pub mod memory;
pub mod models;
pub mod repository;

pub mod prelude {
    pub use crate::db::DbError;
    pub use crate::db::repository::PgRecordStore;
}

const MAX_CONNECTIONS: u32 = 5;

/// Opens the connection pool and brings the schema up to date.
#[instrument(skip(env))]
pub async fn connect(env: &Env) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&env.database_url)
        .await?;

    migrate(&pool).await?;
    tracing::info!("database pool ready");

    Ok(pool)
}

#[instrument(skip(pool))]
pub async fn migrate(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub type DbResult<T> = core::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("record {0} already exists")]
    Duplicate(uuid::Uuid),
}
