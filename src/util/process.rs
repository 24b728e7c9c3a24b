//! Subprocess execution utilities.
//!
//! Two kinds of child processes are used: plain commands ([`ProcessBuilder`]),
//! and interactive shells fed a script on stdin ([`ShellScript`]), which is how
//! a `vcvarsall.bat` environment is carried into the commands that follow it.
//! Both go through the [`Executor`] trait so drivers can be tested without
//! spawning anything.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion, capturing output.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Execute and require success.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                stderr
            );
        }
        Ok(output)
    }

    /// Execute with inherited stdio and return the status only.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        cmd.status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// A script fed line by line to an interactive shell.
///
/// The shell keeps its environment between lines, so a toolchain setup line
/// followed by a build command runs the build inside that toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellScript {
    /// Short name used in status output.
    pub label: String,
    /// Working directory of the shell.
    pub cwd: PathBuf,
    /// Lines written to the shell's stdin.
    pub lines: Vec<String>,
    /// Extra environment for this shell only.
    pub env: BTreeMap<String, String>,
    /// Where stdout goes; inherited when `None`.
    pub log_file: Option<PathBuf>,
}

impl ShellScript {
    pub fn new(label: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        ShellScript {
            label: label.into(),
            cwd: cwd.as_ref().to_path_buf(),
            lines: Vec::new(),
            env: BTreeMap::new(),
            log_file: None,
        }
    }

    /// Append a line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Set an environment variable for this shell.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Redirect stdout to a file.
    pub fn log_to(mut self, path: impl AsRef<Path>) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// The text written to the shell's stdin.
    pub fn stdin_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push_str(LINE_ENDING);
        }
        text
    }
}

/// A launched shell.
///
/// Handles returned by test executors carry no process and count as
/// already finished successfully.
#[derive(Debug)]
pub struct ShellHandle {
    label: String,
    log_file: Option<PathBuf>,
    child: Option<Child>,
}

impl ShellHandle {
    pub fn spawned(label: impl Into<String>, log_file: Option<PathBuf>, child: Child) -> Self {
        ShellHandle {
            label: label.into(),
            log_file,
            child: Some(child),
        }
    }

    pub fn completed(label: impl Into<String>, log_file: Option<PathBuf>) -> Self {
        ShellHandle {
            label: label.into(),
            log_file,
            child: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Block until the shell exits. Returns whether it exited successfully.
    pub fn wait(&mut self) -> Result<bool> {
        match self.child.as_mut() {
            Some(child) => {
                let status = child
                    .wait()
                    .with_context(|| format!("failed to wait for `{}`", self.label))?;
                Ok(status.success())
            }
            None => Ok(true),
        }
    }

    /// Wait at most `timeout`. `None` means the shell is still running.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<Option<bool>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(Some(true));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("failed to poll `{}`", self.label))?
            {
                return Ok(Some(status.success()));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

/// Runs external programs on behalf of the drivers.
pub trait Executor: Sync {
    /// Run a command with inherited stdio. Returns whether it succeeded.
    fn run(&self, cmd: &ProcessBuilder) -> Result<bool>;

    /// Run a command and return its stdout. Fails if the command fails.
    fn capture(&self, cmd: &ProcessBuilder) -> Result<String>;

    /// Start an interactive shell and feed it `script`. Does not wait.
    fn launch(&self, script: &ShellScript) -> Result<ShellHandle>;
}

/// Executor that spawns real processes.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    shell: PathBuf,
}

impl SystemExecutor {
    pub fn new(shell: impl AsRef<Path>) -> Self {
        SystemExecutor {
            shell: shell.as_ref().to_path_buf(),
        }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        SystemExecutor::new(default_shell())
    }
}

impl Executor for SystemExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<bool> {
        tracing::debug!("running `{}`", cmd.display_command());
        Ok(cmd.status()?.success())
    }

    fn capture(&self, cmd: &ProcessBuilder) -> Result<String> {
        tracing::debug!("capturing `{}`", cmd.display_command());
        let output = cmd.exec_and_check()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn launch(&self, script: &ShellScript) -> Result<ShellHandle> {
        let mut cmd = Command::new(&self.shell);
        cmd.current_dir(&script.cwd);
        cmd.envs(&script.env);
        cmd.stdin(Stdio::piped());

        if let Some(ref log) = script.log_file {
            let file = File::create(log)
                .with_context(|| format!("failed to create log file: {}", log.display()))?;
            cmd.stdout(Stdio::from(file));
        }

        tracing::debug!(
            "launching `{}` in {} for {}",
            self.shell.display(),
            script.cwd.display(),
            script.label
        );

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.shell.display()))?;

        // Dropping stdin after the script makes the shell exit at end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.stdin_text().as_bytes())
                .with_context(|| format!("failed to write script to `{}`", script.label))?;
        }

        Ok(ShellHandle::spawned(
            script.label.clone(),
            script.log_file.clone(),
            child,
        ))
    }
}

/// The interactive shell used when none is configured.
pub fn default_shell() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("cmd")
    } else {
        PathBuf::from("sh")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}
