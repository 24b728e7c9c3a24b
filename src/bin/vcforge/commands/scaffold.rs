//! `vcforge scaffold` command

use std::sync::Arc;

use anyhow::Result;

use super::system_executor;
use crate::cli::ScaffoldArgs;
use vcforge::ops::scaffold::{scaffold, ScaffoldOptions};
use vcforge::util::prompt::Prompt;
use vcforge::util::{GlobalContext, Shell};

pub fn execute(args: ScaffoldArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let exec = system_executor(&ctx)?;

    let opts = ScaffoldOptions {
        project_dir: args.project_dir,
        arch: args.arch,
    };

    scaffold(&ctx, &opts, &exec, &mut Prompt::stdio(), shell)?;
    Ok(())
}
