//! Step-by-step migration execution

use crate::error::{MigrateError, MigrateResult};
use crate::executor::{execute_migration, ExecutionContext};
use fl_core::{Catalog, Direction, Migration, MigrationMap};
use fl_db::{Database, VersionStore};
use std::time::{Duration, Instant};

/// Result of a single applied migration
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Migration version
    pub version: i64,

    /// Migration file name
    pub file: String,

    /// Statements (or script units) executed
    pub statements: usize,

    /// Version recorded after the step
    pub recorded_version: i64,

    /// Execution time
    pub duration: Duration,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Direction of travel
    pub direction: Direction,

    /// Version before the first step
    pub start_version: i64,

    /// Version after the last step
    pub final_version: i64,

    /// Steps in the order they ran
    pub steps: Vec<StepOutcome>,

    /// Total execution time
    pub duration: Duration,
}

impl RunReport {
    /// Total statements executed across all steps
    pub fn total_statements(&self) -> usize {
        self.steps.iter().map(|s| s.statements).sum()
    }
}

/// Version that becomes current after running `migration` in `direction`.
///
/// Moving up records the migration's own version. Moving down records the
/// next version in the down sequence, or the closest older file in the
/// catalog (0 when there is none) after the last step.
pub fn version_after(migration: &Migration, direction: Direction, catalog: &Catalog) -> i64 {
    match direction {
        Direction::Up => migration.version,
        Direction::Down => migration
            .next
            .or_else(|| catalog.version_before(migration.version))
            .unwrap_or(0),
    }
}

/// Applies a [`MigrationMap`] one step at a time
pub struct Runner<'a> {
    db: &'a dyn Database,
    store: &'a VersionStore,
    context: ExecutionContext,
}

impl<'a> Runner<'a> {
    /// Create a new runner
    pub fn new(db: &'a dyn Database, store: &'a VersionStore, context: ExecutionContext) -> Self {
        Self { db, store, context }
    }

    /// Run every migration in `map`, in order.
    ///
    /// Each step's new version is recorded before the next step starts.
    /// `on_step` is called after each recorded step. The first failure stops
    /// the run; earlier steps stay applied.
    pub async fn run<F>(
        &self,
        map: &MigrationMap,
        catalog: &Catalog,
        start_version: i64,
        mut on_step: F,
    ) -> MigrateResult<RunReport>
    where
        F: FnMut(&StepOutcome),
    {
        let run_start = Instant::now();
        let mut steps: Vec<StepOutcome> = Vec::with_capacity(map.len());
        let mut current = start_version;

        for migration in map.iter() {
            let step_start = Instant::now();
            let file = migration.source.file_name();
            log::debug!(
                "Running migration {} ({}) {}",
                migration.version,
                file,
                map.direction
            );

            let fail = |message: String, steps: &[StepOutcome]| MigrateError::StepFailed {
                version: migration.version,
                file: file.clone(),
                message,
                applied: steps.iter().map(|s| s.version).collect(),
            };

            let statements =
                match execute_migration(self.db, migration, map.direction, &self.context).await {
                    Ok(n) => n,
                    Err(e) => return Err(fail(e.to_string(), &steps)),
                };

            let recorded_version = version_after(migration, map.direction, catalog);
            if let Err(e) = self.store.record_version(self.db, recorded_version).await {
                return Err(fail(
                    format!("applied, but recording version {recorded_version} failed: {e}"),
                    &steps,
                ));
            }
            current = recorded_version;

            let outcome = StepOutcome {
                version: migration.version,
                file,
                statements,
                recorded_version,
                duration: step_start.elapsed(),
            };
            on_step(&outcome);
            steps.push(outcome);
        }

        Ok(RunReport {
            direction: map.direction,
            start_version,
            final_version: current,
            steps,
            duration: run_start.elapsed(),
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
