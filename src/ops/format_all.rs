//! Implementation of `vcforge format`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::builder::format::{collect_sources, format_files, FormatOptions, FormatSummary};
use crate::util::fs::relative_path;
use crate::util::process::Executor;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Root formatted when no path is given.
pub const DEFAULT_ROOT: &str = "projects";

/// Options for the format command. Unset values come from the configuration.
#[derive(Debug, Clone, Default)]
pub struct FormatAllOptions {
    /// Directories to walk (empty = `projects`)
    pub roots: Vec<PathBuf>,

    /// Formatter executable
    pub formatter: Option<PathBuf>,

    /// Value passed as `-style=`
    pub style: Option<String>,

    /// Number of parallel formatter invocations
    pub jobs: Option<usize>,

    /// Only list the files that would be formatted
    pub dry_run: bool,
}

/// Format every recognised source file below the given roots.
///
/// All roots are walked before anything is formatted, so a missing root
/// fails the run without touching any file.
pub fn format_all(
    ctx: &GlobalContext,
    opts: &FormatAllOptions,
    exec: &dyn Executor,
    shell: &Arc<Shell>,
) -> Result<FormatSummary> {
    let config = ctx.config()?;
    let format_opts = FormatOptions {
        formatter: opts
            .formatter
            .clone()
            .unwrap_or(config.format.formatter),
        style: opts.style.clone().unwrap_or(config.format.style),
        extensions: config.format.extensions,
        jobs: opts.jobs,
    };

    let roots = if opts.roots.is_empty() {
        vec![PathBuf::from(DEFAULT_ROOT)]
    } else {
        opts.roots.clone()
    };

    let mut files = Vec::new();
    for root in &roots {
        let root = ctx.resolve(root);
        let found = collect_sources(&root, &format_opts)?;
        tracing::debug!("{} source file(s) below {}", found.len(), root.display());
        files.extend(found);
    }

    if opts.dry_run {
        for file in &files {
            shell.status(Status::Found, relative_path(ctx.cwd(), file).display());
        }
        shell.note(format!("{} file(s) would be formatted", files.len()));
        return Ok(FormatSummary::default());
    }

    let span = shell.span(
        Status::Formatting,
        format!(
            "{} file(s) with {}",
            files.len(),
            format_opts.formatter.display()
        ),
    );
    let summary = format_files(&files, &format_opts, exec, shell)?;
    if !summary.is_success() {
        shell.warn(format!(
            "{} of {} file(s) could not be formatted",
            summary.failed.len(),
            files.len()
        ));
    }
    span.finish_with_message(format!("formatting {} file(s)", summary.formatted));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{source_tree, RecordingExecutor};
    use crate::util::shell::{ColorChoice, Verbosity};
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> Arc<Shell> {
        Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never))
    }

    #[test]
    fn test_default_root_is_projects() {
        let tmp = TempDir::new().unwrap();
        let (_, expected) = source_tree(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);
        let exec = RecordingExecutor::new();

        let summary = format_all(&ctx, &FormatAllOptions::default(), &exec, &quiet()).unwrap();
        assert_eq!(summary.formatted, expected.len());
        assert_eq!(exec.commands().len(), expected.len());
    }

    #[test]
    fn test_missing_root_formats_nothing() {
        let tmp = TempDir::new().unwrap();
        source_tree(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);
        let exec = RecordingExecutor::new();

        let opts = FormatAllOptions {
            roots: vec![PathBuf::from("projects"), PathBuf::from("missing")],
            ..Default::default()
        };
        let err = format_all(&ctx, &opts, &exec, &quiet()).unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn test_config_and_flags() {
        let tmp = TempDir::new().unwrap();
        source_tree(tmp.path());
        fs::create_dir_all(tmp.path().join(".vcforge")).unwrap();
        fs::write(
            tmp.path().join(".vcforge/config.toml"),
            "[format]\nformatter = \"clang-format-15\"\nstyle = \"LLVM\"\nextensions = [\"h\"]\n",
        )
        .unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);
        let exec = RecordingExecutor::new();

        let opts = FormatAllOptions {
            style: Some("Google".to_string()),
            ..Default::default()
        };
        format_all(&ctx, &opts, &exec, &quiet()).unwrap();

        let lines = exec.command_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("clang-format-15 -i -style=Google "));
        assert!(lines[0].ends_with("FileLog.h"));
    }

    #[test]
    fn test_dry_run_invokes_nothing() {
        let tmp = TempDir::new().unwrap();
        source_tree(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);
        let exec = RecordingExecutor::new();

        let opts = FormatAllOptions {
            dry_run: true,
            ..Default::default()
        };
        let summary = format_all(&ctx, &opts, &exec, &quiet()).unwrap();
        assert_eq!(summary.formatted, 0);
        assert!(exec.commands().is_empty());
    }
}
