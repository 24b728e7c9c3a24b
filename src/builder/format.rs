//! Recursive clang-format runner.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::util::process::{Executor, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// How to invoke the formatter.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub formatter: PathBuf,
    pub style: String,
    /// Extensions without the dot, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Parallel formatter invocations; `None` or 1 runs sequentially.
    pub jobs: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            formatter: PathBuf::from("clang-format"),
            style: "file".to_string(),
            extensions: ["h", "hpp", "inl", "c", "cpp", "cc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            jobs: None,
        }
    }
}

impl FormatOptions {
    /// Whether `path` has one of the recognised extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// `<formatter> -i -style=<style> <path>`
    pub fn command(&self, path: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.formatter)
            .arg("-i")
            .arg(format!("-style={}", self.style))
            .arg(path)
    }
}

/// Every file below `root` the formatter should touch, sorted.
pub fn collect_sources(root: &Path, opts: &FormatOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("source directory not found: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
        if entry.file_type().is_file() && opts.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Outcome of a formatting run.
#[derive(Debug, Default)]
pub struct FormatSummary {
    pub formatted: usize,
    pub failed: Vec<PathBuf>,
}

impl FormatSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the formatter over `files`.
///
/// A failure on one file is reported and the rest still run.
pub fn format_files(
    files: &[PathBuf],
    opts: &FormatOptions,
    exec: &dyn Executor,
    shell: &Arc<Shell>,
) -> Result<FormatSummary> {
    let progress = shell.progress(files.len() as u64, "Formatting");
    let format_one = |file: &PathBuf| -> bool {
        shell.verbose(Status::Formatting, file.display());
        let ok = match exec.run(&opts.command(file)) {
            Ok(true) => true,
            Ok(false) => {
                shell.warn(format!("{} exited with an error", file.display()));
                false
            }
            Err(e) => {
                shell.warn(format!("{}: {:#}", file.display(), e));
                false
            }
        };
        progress.inc(1);
        ok
    };

    let results: Vec<bool> = match opts.jobs {
        Some(jobs) if jobs > 1 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("failed to start formatter thread pool")?;
            pool.install(|| files.par_iter().map(format_one).collect())
        }
        _ => files.iter().map(format_one).collect(),
    };
    progress.finish();

    let mut summary = FormatSummary::default();
    for (file, ok) in files.iter().zip(results) {
        if ok {
            summary.formatted += 1;
        } else {
            summary.failed.push(file.clone());
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{source_tree, CommandPattern, RecordingExecutor};
    use crate::util::shell::{ColorChoice, Verbosity};
    use tempfile::TempDir;

    fn quiet() -> Arc<Shell> {
        Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never))
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let opts = FormatOptions::default();
        assert!(opts.matches(Path::new("a/FileLog.H")));
        assert!(opts.matches(Path::new("a/main.Cpp")));
        assert!(opts.matches(Path::new("tree.inl")));
        assert!(!opts.matches(Path::new("CMakeLists.txt")));
        assert!(!opts.matches(Path::new(".clang-format")));
        assert!(!opts.matches(Path::new("cpp")));
    }

    #[test]
    fn test_command() {
        let opts = FormatOptions {
            style: "Google".into(),
            ..Default::default()
        };
        assert_eq!(
            opts.command(Path::new("main.cpp")).display_command(),
            "clang-format -i -style=Google main.cpp"
        );
    }

    #[test]
    fn test_collect_sources_skips_directories() {
        let tmp = TempDir::new().unwrap();
        let (root, expected) = source_tree(tmp.path());

        let files = collect_sources(&root, &FormatOptions::default()).unwrap();
        assert_eq!(files, expected);
        assert!(!files.iter().any(|f| f.ends_with("legacy.cpp")));
    }

    #[test]
    fn test_collect_sources_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = collect_sources(&tmp.path().join("projects"), &FormatOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_one_invocation_per_file() {
        let tmp = TempDir::new().unwrap();
        let (root, expected) = source_tree(tmp.path());
        let opts = FormatOptions::default();
        let exec = RecordingExecutor::new();

        let files = collect_sources(&root, &opts).unwrap();
        let summary = format_files(&files, &opts, &exec, &quiet()).unwrap();

        assert_eq!(summary.formatted, expected.len());
        let commands = exec.commands();
        assert_eq!(commands.len(), expected.len());
        for (cmd, file) in commands.iter().zip(&expected) {
            assert_eq!(cmd.get_args()[0], "-i");
            assert_eq!(cmd.get_args()[1], "-style=file");
            assert_eq!(Path::new(&cmd.get_args()[2]), file.as_path());
        }
    }

    #[test]
    fn test_parallel_run_formats_everything() {
        let tmp = TempDir::new().unwrap();
        let (root, expected) = source_tree(tmp.path());
        let opts = FormatOptions {
            jobs: Some(4),
            ..Default::default()
        };
        let exec = RecordingExecutor::new();

        let files = collect_sources(&root, &opts).unwrap();
        let summary = format_files(&files, &opts, &exec, &quiet()).unwrap();
        assert_eq!(summary.formatted, expected.len());
        assert_eq!(exec.commands().len(), expected.len());
    }

    #[test]
    fn test_failure_does_not_stop_the_walk() {
        let tmp = TempDir::new().unwrap();
        let (root, expected) = source_tree(tmp.path());
        let opts = FormatOptions::default();
        let exec = RecordingExecutor::new().failing(CommandPattern::Contains("FileLog.h".into()));

        let files = collect_sources(&root, &opts).unwrap();
        let summary = format_files(&files, &opts, &exec, &quiet()).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.formatted, expected.len() - 1);
        assert_eq!(exec.commands().len(), expected.len());
    }
}
