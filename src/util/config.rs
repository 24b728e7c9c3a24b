//! Configuration file support for vcforge.
//!
//! vcforge reads two configuration files:
//! - Global: `~/.vcforge/config.toml` - User-wide defaults
//! - Project: `.vcforge/config.toml` - Project-specific overrides
//!
//! Project keys take precedence over global keys, table by table, so a
//! project file can override `boost.variants` and still inherit
//! `boost.root` from the global file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::util::fs::read_to_string;

/// vcforge configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive shell used to run toolchain scripts (default: `cmd` on Windows).
    pub shell: Option<PathBuf>,

    /// Toolchain selection
    pub toolchain: ToolchainConfig,

    /// Boost compilation
    pub boost: BoostConfig,

    /// Source formatting
    pub format: FormatConfig,

    /// CMake solution generation
    pub cmake: CmakeConfig,
}

/// Toolchain selection settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Preferred toolset version (e.g. "14.0"); skips the selection prompt.
    pub version: Option<String>,
}

/// Boost compilation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Boost source directory.
    pub root: Option<PathBuf>,

    /// Address models to build (32 and/or 64).
    pub address_models: Vec<u32>,

    /// Variants to build ("debug" and/or "release").
    pub variants: Vec<String>,

    /// Runtime links to build ("static" and/or "shared").
    pub runtime_links: Vec<String>,

    /// `define=` entries passed to b2.
    pub defines: Vec<String>,

    /// Libraries passed as `--without-<name>`.
    pub without: Vec<String>,
}

impl Default for BoostConfig {
    fn default() -> Self {
        BoostConfig {
            root: None,
            address_models: vec![32, 64],
            variants: vec!["debug".to_string(), "release".to_string()],
            runtime_links: vec!["shared".to_string()],
            defines: vec![
                "BOOST_ASIO_DISABLE_STD_CHRONO".to_string(),
                "_CRT_SECURE_NO_WARNINGS".to_string(),
            ],
            without: Vec::new(),
        }
    }
}

/// Source formatting settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Formatter executable.
    pub formatter: PathBuf,

    /// Value of the formatter's `-style=` option.
    pub style: String,

    /// File extensions (without dot) that get formatted.
    pub extensions: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            formatter: PathBuf::from("clang-format"),
            style: "file".to_string(),
            extensions: ["h", "hpp", "inl", "c", "cpp", "cc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// CMake solution generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CmakeConfig {
    /// Visual Studio generator name, without the platform suffix.
    pub generator: String,

    /// Build directory, relative to the project root.
    pub build_dir: PathBuf,
}

impl Default for CmakeConfig {
    fn default() -> Self {
        CmakeConfig {
            generator: "Visual Studio 14 2015".to_string(),
            build_dir: PathBuf::from("windows_build"),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.vcforge/config.toml)
/// 2. Global config (~/.vcforge/config.toml)
/// 3. Defaults
///
/// Missing files are skipped; a file that exists but does not parse is an error.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut merged = toml::Table::new();

    for path in global_path.into_iter().chain(Some(project_path)) {
        if !path.exists() {
            continue;
        }
        let contents = read_to_string(path)?;
        let table: toml::Table = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        merge_tables(&mut merged, table);
    }

    toml::Value::Table(merged)
        .try_into()
        .context("invalid configuration")
}

/// Overlay `overlay` onto `base`, recursing into tables.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Get the global vcforge config directory (~/.vcforge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".vcforge"))
}

/// Get the global config path (~/.vcforge/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.vcforge/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".vcforge").join("config.toml")
}
