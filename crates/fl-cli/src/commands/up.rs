//! Up command implementation

use anyhow::Result;
use fl_core::plan_migrations;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::run_map;
use crate::context::RuntimeContext;

/// Execute the up command
pub async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let current = ctx.current_version().await?;
    let catalog = ctx.settings.catalog()?;

    if let Some(target) = args.to {
        if target < current {
            anyhow::bail!(
                "Cannot migrate up to version {}: it is older than the current version {}; use `down --to`",
                target,
                current
            );
        }
        if target > current && !catalog.contains(target) {
            log::warn!("No migration file for version {}; stopping at the closest older one", target);
        }
    }

    let map = plan_migrations(current, args.to, &catalog);
    run_map(&ctx, &map, &catalog, current, args.dry_run).await?;
    Ok(())
}

#[cfg(test)]
#[path = "up_test.rs"]
mod tests;
