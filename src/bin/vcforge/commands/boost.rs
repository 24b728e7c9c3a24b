//! `vcforge boost` command

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use super::system_executor;
use crate::cli::BoostArgs;
use vcforge::ops::boost_build::{boost_build, BoostOptions};
use vcforge::util::prompt::Prompt;
use vcforge::util::{GlobalContext, Shell};

pub fn execute(args: BoostArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let exec = system_executor(&ctx)?;

    let opts = BoostOptions {
        boost_dir: args.boost_dir,
        toolchain: args.toolset,
        address_models: args.address_model,
        variants: args.variant,
        runtime_links: args.runtime_link,
        without: args.without,
        select_libs: args.select_libs,
        wait: args.wait_secs.map(Duration::from_secs),
    };

    let mut prompt = Prompt::stdio();
    let report = boost_build(&ctx, &opts, std::env::vars_os(), &exec, &mut prompt, shell)?;

    if !report.failed_logs.is_empty() {
        bail!(
            "{} of {} boost job(s) failed",
            report.failed_logs.len(),
            report.jobs.len()
        );
    }
    Ok(())
}
