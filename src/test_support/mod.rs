//! Test utilities and mocks for vcforge unit tests.
//!
//! Provides a recording [`Executor`] that never spawns anything and a
//! scripted [`Interact`] implementation with canned answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use vcforge::test_support::{RecordingExecutor, ScriptedPrompt};
//!
//! #[test]
//! fn test_example() {
//!     let exec = RecordingExecutor::new()
//!         .with_capture("b2 --show-libraries", fixtures::b2_show_libraries(&["atomic"]));
//!     let mut prompt = ScriptedPrompt::new(["1"]);
//!     // Drive code with &exec and &mut prompt...
//!     assert_eq!(exec.launched().len(), 0);
//! }
//! ```

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::core::errors::BuildError;
use crate::util::process::{Executor, ProcessBuilder, ShellHandle, ShellScript};
use crate::util::prompt::Interact;

pub use fixtures::*;

/// Pattern for matching command lines.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Match if the command line contains the substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

type LaunchHook = Box<dyn Fn(&ShellScript) + Send + Sync>;

/// Executor that records every request instead of spawning processes.
#[derive(Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<ProcessBuilder>>,
    scripts: Mutex<Vec<ShellScript>>,
    captures: Vec<(CommandPattern, String)>,
    failing: Vec<CommandPattern>,
    on_launch: Option<LaunchHook>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `stdout` from `capture` for command lines containing `substring`.
    pub fn with_capture(mut self, substring: &str, stdout: impl Into<String>) -> Self {
        self.captures
            .push((CommandPattern::Contains(substring.to_string()), stdout.into()));
        self
    }

    /// Report failure from `run` for commands matching `pattern`.
    pub fn failing(mut self, pattern: CommandPattern) -> Self {
        self.failing.push(pattern);
        self
    }

    /// Call `hook` for every launched script, e.g. to create files a real
    /// shell would have produced.
    pub fn on_launch(mut self, hook: impl Fn(&ShellScript) + Send + Sync + 'static) -> Self {
        self.on_launch = Some(Box::new(hook));
        self
    }

    /// Commands passed to `run` or `capture`, in order.
    pub fn commands(&self) -> Vec<ProcessBuilder> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Command lines passed to `run` or `capture`, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    /// Scripts passed to `launch`, in order.
    pub fn launched(&self) -> Vec<ShellScript> {
        self.scripts.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, cmd: &ProcessBuilder) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(cmd.clone());
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<bool> {
        self.record(cmd);
        let line = cmd.display_command();
        Ok(!self.failing.iter().any(|p| p.matches(&line)))
    }

    fn capture(&self, cmd: &ProcessBuilder) -> Result<String> {
        self.record(cmd);
        let line = cmd.display_command();
        for (pattern, stdout) in &self.captures {
            if pattern.matches(&line) {
                return Ok(stdout.clone());
            }
        }
        bail!("unexpected command: {}", line)
    }

    fn launch(&self, script: &ShellScript) -> Result<ShellHandle> {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.push(script.clone());
        }
        if let Some(ref hook) = self.on_launch {
            hook(script);
        }
        Ok(ShellHandle::completed(
            script.label.clone(),
            script.log_file.clone(),
        ))
    }
}

/// [`Interact`] implementation with canned answers.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Every prompt asked, in order.
    pub asked: Vec<String>,
    /// Every line shown, in order.
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            shown: Vec::new(),
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Interact for ScriptedPrompt {
    fn say(&mut self, line: &str) -> Result<()> {
        self.shown.push(line.to_string());
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => Err(BuildError::InputClosed {
                prompt: prompt.trim().to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pattern() {
        assert!(CommandPattern::Contains("show-libraries".into()).matches("b2 --show-libraries"));
        assert!(CommandPattern::Regex(r"^clang-format .*\.cpp$".into())
            .matches("clang-format -i -style=file a.cpp"));
        assert!(CommandPattern::Any.matches(""));
    }

    #[test]
    fn test_recording_executor() {
        let exec = RecordingExecutor::new()
            .with_capture("--version", "1.0")
            .failing(CommandPattern::Contains("bad".into()));

        assert!(exec.run(&ProcessBuilder::new("tool").arg("good")).unwrap());
        assert!(!exec.run(&ProcessBuilder::new("tool").arg("bad")).unwrap());
        assert_eq!(exec.capture(&ProcessBuilder::new("tool").arg("--version")).unwrap(), "1.0");
        assert!(exec.capture(&ProcessBuilder::new("other")).is_err());
        assert_eq!(exec.command_lines().len(), 4);
    }

    #[test]
    fn test_scripted_prompt_runs_out() {
        let mut prompt = ScriptedPrompt::new(["a"]);
        assert_eq!(prompt.ask("1? ").unwrap(), "a");
        assert!(prompt.ask("2? ").is_err());
        assert_eq!(prompt.asked, vec!["1? ", "2? "]);
    }
}
