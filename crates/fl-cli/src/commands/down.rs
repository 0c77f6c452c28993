//! Down command implementation

use anyhow::Result;
use fl_core::{plan_migrations, plan_rollback};

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::run_map;
use crate::context::RuntimeContext;

/// Execute the down command
///
/// Without `--to`, only the current version is rolled back. With `--to`,
/// every migration from the current version down to and including the
/// given version is rolled back.
pub async fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let current = ctx.current_version().await?;
    let catalog = ctx.settings.catalog()?;

    let map = match args.to {
        Some(target) if target > current => {
            anyhow::bail!(
                "Cannot roll back to version {}: it is newer than the current version {}",
                target,
                current
            );
        }
        Some(target) => plan_migrations(current, Some(target), &catalog),
        None => plan_rollback(current, &catalog),
    };

    run_map(&ctx, &map, &catalog, current, args.dry_run).await?;
    Ok(())
}

#[cfg(test)]
#[path = "down_test.rs"]
mod tests;
