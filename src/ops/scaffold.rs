//! Implementation of `vcforge scaffold`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::cmake::{ask_address_model, SolutionGenerator};
use crate::core::job::AddressModel;
use crate::util::process::Executor;
use crate::util::prompt::Interact;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Options for the scaffold command.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Project root containing `CMakeLists.txt` (default: current directory)
    pub project_dir: Option<PathBuf>,

    /// Solution width; asked for when unset
    pub arch: Option<u32>,
}

/// Empty the build directory and generate a fresh solution in it.
///
/// Returns the build directory.
pub fn scaffold(
    ctx: &GlobalContext,
    opts: &ScaffoldOptions,
    exec: &dyn Executor,
    prompt: &mut impl Interact,
    shell: &Shell,
) -> Result<PathBuf> {
    let config = ctx.config()?;
    let arch = opts.arch.map(AddressModel::try_from).transpose()?;

    let root = match opts.project_dir {
        Some(ref dir) => ctx.resolve(dir),
        None => ctx.cwd().to_path_buf(),
    };
    let build_dir = root.join(&config.cmake.build_dir);
    let generator = SolutionGenerator::new(&root, &build_dir, config.cmake.generator);

    generator.prepare(shell)?;

    let model = match arch {
        Some(model) => model,
        None => ask_address_model(prompt)?,
    };
    generator.generate(model, exec, shell)?;

    shell.status(Status::Created, format!("solution in {}", build_dir.display()));
    Ok(build_dir)
}
