//! Flock CLI - versioned schema migrations for DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{create, down, redo, status, up, version};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Down(args) => down::execute(args, &cli.global).await,
        cli::Commands::Redo => redo::execute(&cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Version => version::execute(&cli.global).await,
        cli::Commands::Create(args) => create::execute(args, &cli.global).await,
    }
}
