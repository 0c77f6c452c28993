//! Status command implementation

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use fl_db::VersionRecord;
use serde::Serialize;
use std::collections::HashMap;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Applied state of one migration file
#[derive(Debug, Serialize)]
struct MigrationStatus {
    version: i64,
    file: String,
    kind: String,
    applied: bool,
    applied_at: Option<String>,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let current = ctx.current_version().await?;
    let catalog = ctx.settings.catalog()?;
    let history = ctx
        .store
        .history(ctx.db.as_ref())
        .await
        .context("Failed to read version history")?;

    let applied_times = up_applied_times(&history);

    let statuses: Vec<MigrationStatus> = catalog
        .iter()
        .map(|(version, source)| {
            let applied = version <= current;
            MigrationStatus {
                version,
                file: source.file_name(),
                kind: source.kind.to_string(),
                applied,
                applied_at: if applied {
                    applied_times
                        .get(&version)
                        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                } else {
                    None
                },
            }
        })
        .collect();

    match args.output {
        StatusOutput::Json => {
            let json = serde_json::json!({
                "target": ctx.settings.target.name,
                "current_version": current,
                "migrations": statuses,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        StatusOutput::Table => print_table(&ctx.settings.target.name, current, &statuses),
    }

    Ok(())
}

/// Time each version was last reached by an Up step.
///
/// `history` is newest first. A row counts as an Up step when it records a
/// higher version than the row before it; rows written by a rollback record
/// a lower version and are skipped.
fn up_applied_times(history: &[VersionRecord]) -> HashMap<i64, NaiveDateTime> {
    let mut times = HashMap::new();
    let mut previous: Option<i64> = None;
    for record in history.iter().rev() {
        let moved_up = previous.is_some_and(|p| record.version_id > p);
        if moved_up {
            if let Some(at) = record.applied_at {
                times.insert(record.version_id, at);
            }
        }
        previous = Some(record.version_id);
    }
    times
}

/// Print statuses as an aligned table
fn print_table(target: &str, current: i64, statuses: &[MigrationStatus]) {
    println!("flock: status for target '{}', current version: {}", target, current);
    println!();

    if statuses.is_empty() {
        println!("No migrations found.");
        return;
    }

    let file_width = statuses
        .iter()
        .map(|s| s.file.len())
        .max()
        .unwrap_or(0)
        .max("Migration".len());

    println!("  {:<19}    {:<file_width$}", "Applied At", "Migration");
    println!("  {}", "=".repeat(19 + 4 + file_width));
    for status in statuses {
        let applied = match (&status.applied_at, status.applied) {
            (Some(at), _) => at.clone(),
            (None, true) => "Applied".to_string(),
            (None, false) => "Pending".to_string(),
        };
        println!("  {:<19} -- {}", applied, status.file);
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
