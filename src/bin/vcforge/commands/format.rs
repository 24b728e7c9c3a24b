//! `vcforge format` command

use std::sync::Arc;

use anyhow::Result;

use super::system_executor;
use crate::cli::FormatArgs;
use vcforge::ops::format_all::{format_all, FormatAllOptions};
use vcforge::util::{GlobalContext, Shell};

pub fn execute(args: FormatArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let exec = system_executor(&ctx)?;

    let opts = FormatAllOptions {
        roots: args.paths,
        formatter: args.formatter,
        style: args.style,
        jobs: args.jobs,
        dry_run: args.dry_run,
    };

    format_all(&ctx, &opts, &exec, shell)?;
    Ok(())
}
