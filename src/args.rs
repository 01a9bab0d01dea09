use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Telegram bot that counts and ranks уааа")]
pub struct Cli {
    /// Dotenv file(s) to load before reading the environment; missing files are skipped
    #[arg(short, long = "env-file", default_values = [".env", ".env.secrets"])]
    pub env_files: Vec<PathBuf>,

    /// Apply database migrations and exit
    #[arg(long)]
    pub migrate_only: bool,
}

pub fn parse_cli_args() -> Cli {
    Cli::parse()
}
