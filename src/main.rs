use std::sync::Arc;

use thiserror::Error;

use crate::bot::handler::Handler;
use crate::bot::runner::Poller;
use crate::bot::telegram::{TelegramClient, TelegramError};
use crate::db::prelude::*;
use crate::util::env::{Env, EnvErr};
use crate::util::telemetry::Telemetry;

mod args;
mod bot;
mod db;
mod matcher;
mod stats;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Env(#[from] EnvErr),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::parse_cli_args();
    let (env, env_files) = Env::load(&args.env_files)?;
    let telemetry = Telemetry::new(&env)?.register();

    for path in &env_files {
        tracing::debug!(path = %path.display(), "loaded env file");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting wua bot");

    let pool = db::connect(&env).await?;
    if args.migrate_only {
        tracing::info!("migrations applied, exiting");
        telemetry.shutdown();
        return Ok(());
    }

    let client = Arc::new(TelegramClient::from_env(&env));
    let me = client.get_me().await?;
    tracing::info!(id = me.id, is_bot = me.is_bot, username = ?me.username, "authenticated with telegram");

    let store = Arc::new(PgRecordStore::new(pool));
    let handler = Handler::new(store, client.clone(), me.username)
        .with_leaderboard_order(env.leaderboard_order);

    Poller::new(client, handler, env.poll_timeout_secs).run().await;

    telemetry.shutdown();
    Ok(())
}
