//! Shared helpers for the migration commands

use anyhow::Result;
use fl_core::{Catalog, MigrationMap};
use fl_migrate::{RunReport, StepOutcome};

use crate::context::RuntimeContext;

/// Print one applied step
fn print_step(step: &StepOutcome) {
    println!(
        "OK   {} ({} statement{})",
        step.file,
        step.statements,
        if step.statements == 1 { "" } else { "s" }
    );
}

/// Print the steps a run would take, without executing them
fn print_plan(map: &MigrationMap) {
    println!("Dry run - would run the following migrations:");
    for migration in map.iter() {
        println!(
            "  {:<5} {:>6}  {}",
            map.direction.to_string(),
            migration.version,
            migration.source.file_name()
        );
    }
}

/// Execute `map`, printing progress in the standard format.
///
/// Returns `None` when nothing needed to run or on a dry run.
pub(crate) async fn run_map(
    ctx: &RuntimeContext,
    map: &MigrationMap,
    catalog: &Catalog,
    current: i64,
    dry_run: bool,
) -> Result<Option<RunReport>> {
    let (Some(first), Some(last)) = (map.first(), map.last()) else {
        println!("flock: no migrations to run. current version: {}", current);
        return Ok(None);
    };

    ctx.verbose(&format!(
        "Resolved {} migration(s) {} from {} to {}",
        map.len(),
        map.direction,
        first,
        last
    ));

    if dry_run {
        print_plan(map);
        return Ok(None);
    }

    println!(
        "flock: migrating db target '{}', current version: {}, target: {}",
        ctx.settings.target.name, current, last
    );

    match ctx.runner().run(map, catalog, current, print_step).await {
        Ok(report) => {
            log::info!(
                "Ran {} migration(s) ({} statements) in {:.2}s",
                report.steps.len(),
                report.total_statements(),
                report.duration.as_secs_f64()
            );
            Ok(Some(report))
        }
        Err(e) => {
            eprintln!("FAIL {}, quitting migration", e);
            Err(e.into())
        }
    }
}
