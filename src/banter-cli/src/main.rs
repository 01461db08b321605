//! Banter CLI - Main entry point.

use anyhow::Result;
use clap::Parser;

use banter_cli::cli::{Cli, LogLevel, dispatch_command};
use banter_cli::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else if let Ok(env_level) = std::env::var("BANTER_LOG_LEVEL") {
        LogLevel::from_str_loose(&env_level).unwrap_or(cli.log_level)
    } else {
        cli.log_level
    };
    init_logging(log_level);

    dispatch_command(cli).await
}
