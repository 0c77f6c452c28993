//! Redo command implementation

use anyhow::Result;
use fl_core::{plan_migrations, plan_rollback};

use crate::cli::GlobalArgs;
use crate::commands::common::run_map;
use crate::context::RuntimeContext;

/// Execute the redo command: roll back the current version, then re-apply it
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let current = ctx.current_version().await?;
    let catalog = ctx.settings.catalog()?;

    let rollback = plan_rollback(current, &catalog);
    let Some(report) = run_map(&ctx, &rollback, &catalog, current, false).await? else {
        return Ok(());
    };

    let reapply = plan_migrations(report.final_version, Some(current), &catalog);
    run_map(&ctx, &reapply, &catalog, report.final_version, false).await?;
    Ok(())
}
