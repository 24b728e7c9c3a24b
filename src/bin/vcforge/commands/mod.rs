//! Command implementations

pub mod boost;
pub mod completions;
pub mod format;
pub mod scaffold;
pub mod toolchain;

use anyhow::Result;
use vcforge::util::process::{default_shell, SystemExecutor};
use vcforge::util::GlobalContext;

/// Executor running scripts in the configured shell.
fn system_executor(ctx: &GlobalContext) -> Result<SystemExecutor> {
    let config = ctx.config()?;
    let shell = config.shell.unwrap_or_else(default_shell);
    tracing::debug!("using shell `{}`", shell.display());
    Ok(SystemExecutor::new(shell))
}
