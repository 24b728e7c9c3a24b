//! Boost compilation with b2.
//!
//! Everything here runs inside an interactive shell that first calls the
//! selected `vcvarsall.bat`, so b2 sees the MSVC environment. Each compile job
//! gets its own shell, log file and zlib environment.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;

use crate::core::errors::BuildError;
use crate::core::job::{AddressModel, CompileJob};
use crate::core::toolchain::{ToolchainInfo, VsVersion};
use crate::util::fs::{lexical_normalize, normalize_path, to_forward_slashes};
use crate::util::process::{Executor, ProcessBuilder, ShellHandle, ShellScript};
use crate::util::prompt::Interact;
use crate::util::shell::{Shell, Status};

/// File name of the build driver produced by `bootstrap.bat`.
#[cfg(windows)]
pub const BUILD_DRIVER: &str = "b2.exe";
#[cfg(not(windows))]
pub const BUILD_DRIVER: &str = "b2";

/// Platform passed to `vcvarsall.bat` for the bootstrap.
const BOOTSTRAP_PLATFORM: &str = "x64";

/// Environment variable b2's zlib module reads the library directory from.
pub const ZLIB_LIBRARY_PATH: &str = "ZLIB_LIBRARY_PATH";
/// Environment variable b2's zlib module reads the include directory from.
pub const ZLIB_INCLUDE: &str = "ZLIB_INCLUDE";

static LIBRARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s+(\w+)\s*$").expect("valid regex"));

/// A Boost source tree.
#[derive(Debug, Clone)]
pub struct BoostTree {
    root: PathBuf,
}

impl BoostTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BoostTree { root: root.into() }
    }

    /// Locate the Boost tree.
    ///
    /// An explicit directory must exist. Otherwise `cwd` is used when it
    /// contains a `boost` header directory, else `../boost_inuse`.
    pub fn locate(cwd: &Path, explicit: Option<&Path>) -> Result<Self, BuildError> {
        if let Some(dir) = explicit {
            let dir = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                cwd.join(dir)
            };
            if dir.is_dir() {
                return Ok(BoostTree::new(normalize_path(&dir)));
            }
            return Err(BuildError::BoostDirNotFound { path: dir });
        }

        if cwd.join("boost").is_dir() {
            return Ok(BoostTree::new(cwd));
        }

        let sibling = lexical_normalize(&cwd.join("..").join("boost_inuse"));
        if sibling.is_dir() {
            Ok(BoostTree::new(sibling))
        } else {
            Err(BuildError::BoostDirNotFound { path: sibling })
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the build driver executable.
    pub fn build_driver(&self) -> PathBuf {
        self.root.join(BUILD_DRIVER)
    }

    pub fn has_build_driver(&self) -> bool {
        self.build_driver().is_file()
    }

    /// Width-specific zlib directory next to the Boost tree.
    pub fn zlib_dir(&self, model: AddressModel) -> PathBuf {
        lexical_normalize(&self.root.join("..").join("zlib").join(model.zlib_dir_name()))
    }

    /// zlib paths for `model`, when both `lib` and `include` exist.
    pub fn zlib_paths(&self, model: AddressModel) -> Option<ZlibPaths> {
        let dir = self.zlib_dir(model);
        let lib = dir.join("lib");
        let include = dir.join("include");
        if lib.is_dir() && include.is_dir() {
            Some(ZlibPaths {
                lib: to_forward_slashes(&normalize_path(&lib)),
                include: to_forward_slashes(&normalize_path(&include)),
            })
        } else {
            None
        }
    }
}

/// Absolute zlib directories, forward slashed, handed to one job's shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZlibPaths {
    pub lib: String,
    pub include: String,
}

/// Build `b2` with `bootstrap.bat` unless it already exists.
///
/// `setup` is the toolchain invocation, e.g. `call "...\vcvarsall.bat"`.
pub fn ensure_build_driver(
    tree: &BoostTree,
    setup: &str,
    exec: &dyn Executor,
    shell: &Shell,
) -> Result<()> {
    if tree.has_build_driver() {
        tracing::debug!("{} already present", tree.build_driver().display());
        return Ok(());
    }
    if setup.trim().is_empty() {
        return Err(BuildError::EmptyCommand.into());
    }

    shell.status(
        Status::Bootstrapping,
        format!("{} in {}", BUILD_DRIVER, tree.root().display()),
    );

    let script = ShellScript::new("bootstrap", tree.root())
        .line(format!("{} {}", setup, BOOTSTRAP_PLATFORM))
        .line("call bootstrap.bat");
    let mut handle = exec.launch(&script)?;
    handle.wait()?;

    if !tree.has_build_driver() {
        return Err(BuildError::BootstrapFailed {
            path: tree.build_driver(),
        }
        .into());
    }
    shell.status(Status::Created, tree.build_driver().display());
    Ok(())
}

/// Library names from `b2 --show-libraries`, one per `- name` line.
pub fn parse_library_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| LIBRARY_LINE.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Parse a comma-separated list of 1-based indices.
///
/// Any token that is not an integer (including an empty answer) means
/// "exclude nothing".
pub fn parse_exclusions(input: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    for token in input.split(',') {
        match token.trim().parse::<usize>() {
            Ok(index) => indices.push(index),
            Err(_) => return Vec::new(),
        }
    }
    indices
}

/// Which Boost libraries to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySelection {
    entries: Vec<(String, bool)>,
}

impl LibrarySelection {
    /// Every library included.
    pub fn all(names: Vec<String>) -> Self {
        LibrarySelection {
            entries: names.into_iter().map(|n| (n, true)).collect(),
        }
    }

    /// Every library except the given 1-based indices.
    pub fn excluding(names: Vec<String>, excluded: &[usize]) -> Self {
        LibrarySelection {
            entries: names
                .into_iter()
                .enumerate()
                .map(|(i, n)| (n, !excluded.contains(&(i + 1))))
                .collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, included)| *included)
    }

    pub fn included(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, included)| *included)
            .map(|(n, _)| n.as_str())
    }

    /// b2 arguments: nothing when every library is built, otherwise one
    /// `--with-<name>` per included library.
    pub fn to_args(&self) -> Vec<String> {
        if self.is_complete() {
            return Vec::new();
        }
        self.included().map(|n| format!("--with-{}", n)).collect()
    }

    /// Numbered listing with a check mark on included libraries.
    pub fn listing(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (name, included))| {
                let line = format!("{:2}. {:<30}{}", i + 1, name, if *included { "√" } else { "" });
                line.trim_end().to_string()
            })
            .collect()
    }
}

/// Ask the operator which libraries to skip.
pub fn select_libraries(
    tree: &BoostTree,
    exec: &dyn Executor,
    prompt: &mut impl Interact,
) -> Result<LibrarySelection> {
    if !tree.has_build_driver() {
        return Err(BuildError::BuildDriverMissing {
            path: tree.build_driver(),
        }
        .into());
    }

    let output = exec.capture(
        &ProcessBuilder::new(tree.build_driver())
            .arg("--show-libraries")
            .cwd(tree.root()),
    )?;
    let names = parse_library_list(&output);

    for line in LibrarySelection::all(names.clone()).listing() {
        prompt.say(&line)?;
    }

    loop {
        let answer =
            prompt.ask("Libraries to skip (comma separated indices, empty builds all): ")?;
        let excluded = parse_exclusions(&answer);
        if excluded.is_empty() {
            return Ok(LibrarySelection::all(names));
        }

        let selection = LibrarySelection::excluding(names.clone(), &excluded);
        for line in selection.listing() {
            prompt.say(&line)?;
        }
        let confirm = prompt.ask("Confirm? (y or n) ")?;
        if matches!(confirm.trim(), "y" | "Y") {
            return Ok(selection);
        }
    }
}

/// The part of the b2 invocation shared by every job.
#[derive(Debug, Clone)]
pub struct CompileCommand {
    toolset: VsVersion,
    setup: String,
    library_args: Vec<String>,
    defines: Vec<String>,
}

impl CompileCommand {
    pub fn new(toolchain: &ToolchainInfo) -> Self {
        CompileCommand {
            toolset: toolchain.version,
            setup: toolchain.setup_invocation(),
            library_args: Vec::new(),
            defines: Vec::new(),
        }
    }

    /// Replace the toolchain setup invocation.
    pub fn setup(mut self, setup: impl Into<String>) -> Self {
        self.setup = setup.into();
        self
    }

    /// Add library selection arguments (`--with-x`, `--without-x`).
    pub fn library_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.library_args.extend(args);
        self
    }

    /// Add `define=` entries.
    pub fn defines(mut self, defines: impl IntoIterator<Item = String>) -> Self {
        self.defines.extend(defines);
        self
    }

    /// The b2 command line for `job`.
    pub fn b2_line(&self, job: &CompileJob) -> String {
        let mut parts = vec![
            "b2".to_string(),
            format!("toolset={}", self.toolset.b2_toolset()),
            "--layout=versioned".to_string(),
            "--build-type=complete".to_string(),
        ];
        parts.extend(self.library_args.iter().cloned());
        parts.extend([
            "--hash".to_string(),
            "threading=multi".to_string(),
            "link=static".to_string(),
            format!("address-model={}", job.address_model.bits()),
            format!("variant={}", job.variant),
            format!("runtime-link={}", job.runtime_link),
        ]);
        parts.extend(self.defines.iter().map(|d| format!("define={}", d)));
        parts.join(" ")
    }

    /// Shell script for `job`: toolchain setup for its platform, then b2.
    pub fn script(&self, tree: &BoostTree, job: &CompileJob) -> Result<ShellScript> {
        if self.setup.trim().is_empty() {
            return Err(BuildError::EmptyCommand.into());
        }

        let mut script = ShellScript::new(job.to_string(), tree.root())
            .line(format!("{} {}", self.setup, job.platform()))
            .line(self.b2_line(job))
            .log_to(tree.root().join(job.log_file_name()));

        if let Some(zlib) = tree.zlib_paths(job.address_model) {
            script = script
                .env(ZLIB_LIBRARY_PATH, zlib.lib)
                .env(ZLIB_INCLUDE, zlib.include);
        }
        Ok(script)
    }
}

/// Launch one compile job and return its handle.
///
/// With `wait`, blocks up to that long; a job still running afterwards is
/// returned as is.
pub fn launch_compile(
    tree: &BoostTree,
    command: &CompileCommand,
    job: &CompileJob,
    exec: &dyn Executor,
    shell: &Shell,
    wait: Option<Duration>,
) -> Result<ShellHandle> {
    let script = command.script(tree, job)?;

    match (script.env.get(ZLIB_LIBRARY_PATH), script.env.get(ZLIB_INCLUDE)) {
        (Some(lib), Some(include)) => shell.verbose(
            Status::Found,
            format!("zlib for {} (lib: {}, include: {})", job.platform(), lib, include),
        ),
        _ => shell.warn(format!(
            "no zlib support for {} ({} missing lib or include)",
            job.platform(),
            tree.zlib_dir(job.address_model).display()
        )),
    }

    let mut handle = exec.launch(&script)?;
    shell.status(
        Status::Compiling,
        format!("boost {} (log: {})", job, job.log_file_name()),
    );

    if let Some(timeout) = wait {
        match handle.wait_timeout(timeout)? {
            Some(_) => tracing::debug!("{} finished within {:?}", job, timeout),
            None => tracing::debug!("{} still running after {:?}", job, timeout),
        }
    }
    Ok(handle)
}
