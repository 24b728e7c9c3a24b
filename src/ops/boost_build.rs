//! Implementation of `vcforge boost`.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use crate::builder::boost::{
    ensure_build_driver, launch_compile, select_libraries, BoostTree, CompileCommand,
};
use crate::builder::toolchain::locate_toolchain;
use crate::core::job::{expand_jobs, CompileJob};
use crate::core::toolchain::VsVersion;
use crate::util::config::Config;
use crate::util::process::Executor;
use crate::util::prompt::Interact;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Options for the boost command. Empty lists fall back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct BoostOptions {
    /// Boost source directory
    pub boost_dir: Option<PathBuf>,

    /// Toolset version to use without prompting
    pub toolchain: Option<VsVersion>,

    /// Address models to build
    pub address_models: Vec<u32>,

    /// Variants to build
    pub variants: Vec<String>,

    /// Runtime links to build
    pub runtime_links: Vec<String>,

    /// Libraries to leave out (`--without-<name>`)
    pub without: Vec<String>,

    /// Interactively choose the libraries to build
    pub select_libs: bool,

    /// How long to wait on each job right after launching it
    pub wait: Option<Duration>,
}

/// What a boost run did.
#[derive(Debug, Default)]
pub struct BoostReport {
    /// Every job that was launched, in launch order.
    pub jobs: Vec<CompileJob>,

    /// Log files of jobs whose shell exited with an error.
    pub failed_logs: Vec<PathBuf>,
}

fn or_config<T: Clone>(cli: &[T], config: &[T]) -> Vec<T> {
    if cli.is_empty() {
        config.to_vec()
    } else {
        cli.to_vec()
    }
}

fn preferred_toolchain(opts: &BoostOptions, config: &Config) -> Result<Option<VsVersion>> {
    if opts.toolchain.is_some() {
        return Ok(opts.toolchain);
    }
    config
        .toolchain
        .version
        .as_deref()
        .map(|v| {
            v.parse::<VsVersion>()
                .map_err(|e| anyhow!("invalid `toolchain.version` in config: {}", e))
        })
        .transpose()
}

/// Compile Boost for every requested configuration.
///
/// `vars` is the environment the toolchain locator scans. Jobs run
/// concurrently; this returns once every one of them has exited.
pub fn boost_build<I, K, V>(
    ctx: &GlobalContext,
    opts: &BoostOptions,
    vars: I,
    exec: &dyn Executor,
    prompt: &mut impl Interact,
    shell: &Arc<Shell>,
) -> Result<BoostReport>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let config = ctx.config()?;

    let jobs = expand_jobs(
        &or_config(&opts.address_models, &config.boost.address_models),
        &or_config(&opts.variants, &config.boost.variants),
        &or_config(&opts.runtime_links, &config.boost.runtime_links),
    )?;
    if jobs.is_empty() {
        bail!("nothing to build: no address model, variant or runtime link selected");
    }

    let explicit_dir = opts.boost_dir.clone().or(config.boost.root.clone());
    let tree = BoostTree::locate(ctx.cwd(), explicit_dir.as_deref())?;
    shell.status(Status::Found, format!("boost in {}", tree.root().display()));

    shell.status(Status::Locating, "Visual Studio toolchains");
    let toolchain = locate_toolchain(vars, preferred_toolchain(opts, &config)?, prompt)?;
    shell.status(
        Status::Found,
        format!(
            "VS {} ({}) from {}",
            toolchain.version,
            toolchain.setup_script().display(),
            toolchain.source
        ),
    );

    ensure_build_driver(&tree, &toolchain.setup_invocation(), exec, shell)?;

    let mut library_args = if opts.select_libs {
        select_libraries(&tree, exec, prompt)?.to_args()
    } else {
        Vec::new()
    };
    library_args.extend(
        or_config(&opts.without, &config.boost.without)
            .iter()
            .map(|lib| format!("--without-{}", lib)),
    );

    let command = CompileCommand::new(&toolchain)
        .library_args(library_args)
        .defines(config.boost.defines.iter().cloned());

    let span = shell.span(
        Status::Info,
        format!("launching {} boost job(s) in {}", jobs.len(), tree.root().display()),
    );

    let mut handles = Vec::with_capacity(jobs.len());
    for job in &jobs {
        handles.push(launch_compile(&tree, &command, job, exec, shell, opts.wait)?);
    }

    shell.status(Status::Waiting, format!("for {} job(s)", handles.len()));
    let mut failed_logs = Vec::new();
    for mut handle in handles {
        if handle.wait()? {
            shell.verbose(Status::Finished, handle.label());
            continue;
        }
        let log = handle
            .log_file()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        shell.warn(format!(
            "{} exited with an error; see {}",
            handle.label(),
            log.display()
        ));
        failed_logs.push(log);
    }

    span.finish_with_message(format!("boost ({} job(s))", jobs.len()));
    Ok(BoostReport { jobs, failed_logs })
}
