//! Interactive operator input.
//!
//! Drivers only see the [`Interact`] trait; the decision logic for each prompt
//! lives in plain functions that take the answer text, and [`Interact::ask_until`]
//! loops until one of them accepts.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::core::errors::BuildError;

/// Something that can show text to the operator and read answers back.
pub trait Interact {
    /// Print one line of text.
    fn say(&mut self, line: &str) -> Result<()>;

    /// Print `prompt` and read one answer, without the trailing newline.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Ask until `parse` accepts an answer.
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Option<T>,
    ) -> Result<T>
    where
        Self: Sized,
    {
        loop {
            let answer = self.ask(prompt)?;
            if let Some(value) = parse(answer.trim()) {
                return Ok(value);
            }
            tracing::debug!("rejected answer {:?}", answer);
        }
    }
}

/// Prompt over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    /// Consume the prompt and return the writer (handy for inspecting output in tests).
    pub fn into_output(self) -> W {
        self.output
    }
}

impl Prompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on the process terminal. Questions go to stderr so stdout stays clean.
    pub fn stdio() -> Self {
        Prompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Interact for Prompt<R, W> {
    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("failed to write to terminal")
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt).context("failed to write to terminal")?;
        self.output.flush().context("failed to flush terminal")?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("failed to read answer")?;
        if read == 0 {
            return Err(BuildError::InputClosed {
                prompt: prompt.trim().to_string(),
            }
            .into());
        }

        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_strips_line_ending() {
        let mut prompt = Prompt::new(Cursor::new("hello\r\n"), Vec::new());
        assert_eq!(prompt.ask("? ").unwrap(), "hello");
        assert_eq!(String::from_utf8(prompt.into_output()).unwrap(), "? ");
    }

    #[test]
    fn test_ask_until_reprompts() {
        let mut prompt = Prompt::new(Cursor::new("abc\n7\n2\n"), Vec::new());
        let value = prompt
            .ask_until("n: ", |s| s.parse::<u32>().ok().filter(|n| *n < 5))
            .unwrap();
        assert_eq!(value, 2);
        let shown = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(shown.matches("n: ").count(), 3);
    }

    #[test]
    fn test_ask_on_closed_input() {
        let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
        let err = prompt.ask("choice: ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InputClosed { .. })
        ));
    }
}
