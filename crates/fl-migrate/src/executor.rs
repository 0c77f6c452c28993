//! Executors for the two migration kinds.
//!
//! SQL migrations run the statements of the requested section inside one
//! transaction. Script migrations run as a child process and receive the
//! following environment variables:
//! - `FLOCK_DATABASE_PATH`: DuckDB file path
//! - `FLOCK_DIRECTION`: `up` or `down`
//! - `FLOCK_VERSION`: the migration version
//!
//! The parent connection is closed while a script runs so the child can take
//! the database file lock, and reopened once it exits.

use crate::error::{MigrateError, MigrateResult};
use fl_core::{split_statements, Direction, Migration, MigrationKind};
use fl_db::Database;
use std::collections::HashMap;
use std::path::Path;

/// Settings shared by every step of a run
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Database path handed to script migrations
    pub database_path: String,
}

/// Execute one migration in `direction`, returning the number of statements
/// (or script units) executed.
pub async fn execute_migration(
    db: &dyn Database,
    migration: &Migration,
    direction: Direction,
    context: &ExecutionContext,
) -> MigrateResult<usize> {
    match migration.source.kind {
        MigrationKind::Sql => run_sql_migration(db, &migration.source.path, direction).await,
        MigrationKind::Script => {
            run_script_with_released_db(db, migration, direction, context).await
        }
    }
}

/// Run the `direction` section of a SQL migration in a transaction
async fn run_sql_migration(
    db: &dyn Database,
    path: &Path,
    direction: Direction,
) -> MigrateResult<usize> {
    let content = std::fs::read_to_string(path).map_err(|e| MigrateError::ReadScript {
        path: path.display().to_string(),
        source: e,
    })?;

    let statements = split_statements(&content, direction)?;
    if statements.is_empty() {
        log::warn!(
            "{} has no {} statements",
            path.display(),
            direction
        );
        return Ok(0);
    }

    Ok(db.execute_in_transaction(&statements).await?)
}

const IN_MEMORY_PATH: &str = ":memory:";

const GO_RUN_ARGS: &[&str] = &["run"];

const NO_ARGS: &[&str] = &[];

/// Program and leading arguments used to run a script
fn interpreter_for(path: &Path) -> Option<(&'static str, &'static [&'static str])> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("go") => Some(("go", GO_RUN_ARGS)),
        Some("sh") => Some(("sh", NO_ARGS)),
        _ => None,
    }
}

/// Build environment variables for a script migration
fn build_env_vars(
    version: i64,
    direction: Direction,
    context: &ExecutionContext,
) -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert(
        "FLOCK_DATABASE_PATH".to_string(),
        context.database_path.clone(),
    );
    env.insert("FLOCK_DIRECTION".to_string(), direction.to_string());
    env.insert("FLOCK_VERSION".to_string(), version.to_string());
    env
}

/// Release `db`, run the script, then reopen `db` whatever the outcome
async fn run_script_with_released_db(
    db: &dyn Database,
    migration: &Migration,
    direction: Direction,
    context: &ExecutionContext,
) -> MigrateResult<usize> {
    let path = &migration.source.path;
    if context.database_path == IN_MEMORY_PATH {
        return Err(MigrateError::ScriptNeedsFileDatabase {
            path: path.display().to_string(),
        });
    }

    db.release()?;
    let result = run_script_migration(path, migration.version, direction, context).await;
    let reopened = db.reopen();

    let units = result?;
    reopened?;
    Ok(units)
}

/// Run a script migration as a child process
async fn run_script_migration(
    path: &Path,
    version: i64,
    direction: Direction,
    context: &ExecutionContext,
) -> MigrateResult<usize> {
    let (program, args) = interpreter_for(path).ok_or_else(|| MigrateError::NoInterpreter {
        path: path.display().to_string(),
    })?;

    let output = tokio::process::Command::new(program)
        .args(args)
        .arg(path)
        .arg(direction.to_string())
        .envs(build_env_vars(version, direction, context))
        .output()
        .await
        .map_err(|e| MigrateError::ScriptLaunch {
            program: program.to_string(),
            path: path.display().to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(MigrateError::ScriptFailed {
            path: path.display().to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        log::debug!("[{}] {}", version, line);
    }
    Ok(1)
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
