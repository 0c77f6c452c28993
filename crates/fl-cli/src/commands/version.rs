//! Version command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the version command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let current = ctx.current_version().await?;
    println!("flock: dbversion {}", current);
    Ok(())
}
