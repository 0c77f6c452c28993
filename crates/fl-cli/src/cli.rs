//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Flock - versioned schema migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "flock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Named target from the config file
    #[arg(short, long, global = true, env = "FLOCK_TARGET")]
    pub target: Option<String>,

    /// Override the database path
    #[arg(long, global = true, env = "FLOCK_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Up(UpArgs),

    /// Roll back migrations
    Down(DownArgs),

    /// Roll back the current migration and apply it again
    Redo,

    /// Show the applied state of every migration
    Status(StatusArgs),

    /// Print the current database version
    Version,

    /// Create a new migration file
    Create(CreateArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop at this version (default: most recent)
    #[arg(long)]
    pub to: Option<i64>,

    /// Print the plan without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Roll back every migration down to and including this version
    /// (default: only the current one)
    #[arg(long)]
    pub to: Option<i64>,

    /// Print the plan without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Short description used in the file name
    pub name: String,

    /// Kind of migration to create
    #[arg(short, long, value_enum, default_value = "sql")]
    pub kind: CreateKind,
}

/// Migration file kinds that can be created
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    /// Plain SQL with Up/Down sections
    Sql,
    /// Shell script
    Sh,
    /// Go program
    Go,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
