//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// An entry that could not be removed by [`clear_dir`].
#[derive(Debug)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Make `dir` an existing, empty directory.
///
/// Creates it when missing. When present, every entry inside is removed
/// (directories recursively); entries that cannot be removed are returned
/// rather than aborting the rest.
pub fn clear_dir(dir: &Path) -> Result<Vec<RemovalFailure>> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        return Ok(Vec::new());
    }

    let mut failures = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let result = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        if let Err(error) = result {
            failures.push(RemovalFailure { path, error });
        }
    }
    Ok(failures)
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => strip_verbatim_prefix(canonical),
        Err(_) => path.to_path_buf(),
    }
}

/// Drop the `\\?\` prefix Windows adds to canonical paths; cmd and b2 reject it.
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(stripped) if !stripped.starts_with("UNC") => PathBuf::from(stripped),
        _ => path,
    }
}

/// Path text with `/` separators.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lexical_normalize() {
        let p = Path::new("/vs/Common7/Tools/../../VC/vcvarsall.bat");
        assert_eq!(lexical_normalize(p), PathBuf::from("/vs/VC/vcvarsall.bat"));

        let p = Path::new("a/./b/../c");
        assert_eq!(lexical_normalize(p), PathBuf::from("a/c"));

        let p = Path::new("../x");
        assert_eq!(lexical_normalize(p), PathBuf::from("../x"));
    }

    #[test]
    fn test_clear_dir_empties_existing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build");
        fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        fs::write(dir.join("CMakeCache.txt"), "cache").unwrap();
        fs::write(dir.join("nested/deeper/obj.o"), "obj").unwrap();

        let failures = clear_dir(&dir).unwrap();

        assert!(failures.is_empty());
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_dir_creates_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("fresh");

        clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn test_to_forward_slashes() {
        assert_eq!(to_forward_slashes(Path::new(r"C:\zlib\win64\lib")), "C:/zlib/win64/lib");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/p"), Path::new("/p/src/a.cpp")),
            PathBuf::from("src/a.cpp")
        );
    }
}
