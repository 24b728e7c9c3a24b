//! Visual Studio solution generation with CMake.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::job::AddressModel;
use crate::util::fs::{clear_dir, relative_path, to_forward_slashes};
use crate::util::process::{find_cmake, Executor, ShellScript};
use crate::util::prompt::Interact;
use crate::util::shell::{Shell, Status};

/// Generator used when none is configured.
pub const DEFAULT_GENERATOR: &str = "Visual Studio 14 2015";

/// Full generator name for a width: 64-bit appends ` Win64`.
pub fn generator_name(base: &str, model: AddressModel) -> String {
    match model {
        AddressModel::X86 => base.to_string(),
        AddressModel::X64 => format!("{} Win64", base),
    }
}

/// Parse an operator's width answer. Only `32` and `64` are accepted.
pub fn parse_width(input: &str) -> Option<AddressModel> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|bits| AddressModel::try_from(bits).ok())
}

/// Ask for the solution width until a valid answer is given.
pub fn ask_address_model(prompt: &mut impl Interact) -> Result<AddressModel> {
    prompt.ask_until("Generate a 32-bit or 64-bit solution? (32/64) ", parse_width)
}

/// Generates a solution for a project root into a build directory.
#[derive(Debug, Clone)]
pub struct SolutionGenerator {
    project_root: PathBuf,
    build_dir: PathBuf,
    generator: String,
}

impl SolutionGenerator {
    pub fn new(
        project_root: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        generator: impl Into<String>,
    ) -> Self {
        SolutionGenerator {
            project_root: project_root.into(),
            build_dir: build_dir.into(),
            generator: generator.into(),
        }
    }

    /// The project root as seen from the build directory.
    fn source_arg(&self) -> String {
        let source = relative_path(&self.build_dir, &self.project_root);
        let source = match to_forward_slashes(&source) {
            s if s.is_empty() => ".".to_string(),
            s => s,
        };
        if source.contains(char::is_whitespace) {
            format!("\"{}\"", source)
        } else {
            source
        }
    }

    /// Empty the build directory, creating it when missing.
    ///
    /// Entries that cannot be removed are reported and left in place.
    pub fn prepare(&self, shell: &Shell) -> Result<()> {
        let failures = clear_dir(&self.build_dir)?;
        for failure in &failures {
            shell.warn(format!(
                "could not remove {}: {}",
                failure.path.display(),
                failure.error
            ));
        }
        if failures.is_empty() {
            shell.verbose(Status::Removed, format!("contents of {}", self.build_dir.display()));
        }
        Ok(())
    }

    /// The shell script running the generator from the build directory.
    pub fn script(&self, model: AddressModel) -> ShellScript {
        ShellScript::new("cmake", &self.build_dir).line(format!(
            "cmake -G\"{}\" {}",
            generator_name(&self.generator, model),
            self.source_arg()
        ))
    }

    /// Run the generator and wait for it.
    pub fn generate(&self, model: AddressModel, exec: &dyn Executor, shell: &Shell) -> Result<()> {
        if find_cmake().is_none() {
            tracing::debug!("cmake not found in PATH; relying on the shell to resolve it");
        }

        shell.status(
            Status::Generating,
            format!(
                "{} solution in {}",
                generator_name(&self.generator, model),
                self.build_dir.display()
            ),
        );

        let mut handle = exec.launch(&self.script(model))?;
        if !handle.wait()? {
            bail!(
                "cmake failed to generate a {}-bit solution in {}",
                model.bits(),
                self.build_dir.display()
            );
        }
        Ok(())
    }
}
