//! Visual Studio toolchain detection.
//!
//! Toolchains are found in two places:
//! 1. `VS<nnn>COMNTOOLS` environment variables (VS 2015 and older), each
//!    pointing at `Common7\Tools`, two levels below `VC\vcvarsall.bat`.
//! 2. `vswhere.exe` (VS 2017 and newer), whose installations keep the script
//!    under `VC\Auxiliary\Build`.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::core::errors::BuildError;
use crate::core::toolchain::{ToolchainInfo, ToolchainSource, VsVersion};
use crate::util::fs::lexical_normalize;
use crate::util::prompt::Interact;

static COMNTOOLS_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^VS(\d+)COMNTOOLS$").expect("valid regex"));

/// Candidates from `VS<nnn>COMNTOOLS` variables whose `vcvarsall.bat` exists.
///
/// Variables whose name is not valid UTF-8 are ignored.
pub fn toolchains_from_env<I, K, V>(vars: I) -> Vec<ToolchainInfo>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut found = Vec::new();
    for (name, value) in vars {
        let Some(name) = name.as_ref().to_str() else {
            continue;
        };
        let Some(caps) = COMNTOOLS_VAR.captures(name) else {
            continue;
        };
        let Ok(tenths) = caps[1].parse::<u32>() else {
            continue;
        };

        let script = lexical_normalize(
            &Path::new(value.as_ref())
                .join("..")
                .join("..")
                .join("VC")
                .join("vcvarsall.bat"),
        );
        if !script.exists() {
            tracing::debug!("{} points at missing {}", name, script.display());
            continue;
        }

        found.push(ToolchainInfo::new(
            VsVersion::from_tenths(tenths),
            script,
            ToolchainSource::Environment(name.to_string()),
        ));
    }
    found
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VswhereInstance {
    installation_path: PathBuf,
    installation_version: String,
}

/// MSVC toolset shipped with a Visual Studio major version.
fn toolset_for_vs_major(major: u32) -> Option<VsVersion> {
    match major {
        15 => Some(VsVersion::from_tenths(141)),
        16 => Some(VsVersion::from_tenths(142)),
        17 => Some(VsVersion::from_tenths(143)),
        _ => None,
    }
}

/// Parse `vswhere -format json` output into candidates.
///
/// Existence of the setup scripts is not checked here.
pub fn parse_vswhere_json(json: &str) -> Result<Vec<ToolchainInfo>> {
    let instances: Vec<VswhereInstance> =
        serde_json::from_str(json).context("failed to parse vswhere output")?;

    Ok(instances
        .into_iter()
        .filter_map(|inst| {
            let major = inst.installation_version.split('.').next()?.parse().ok()?;
            let Some(version) = toolset_for_vs_major(major) else {
                tracing::debug!(
                    "skipping Visual Studio {} (unknown toolset)",
                    inst.installation_version
                );
                return None;
            };
            let script = inst
                .installation_path
                .join("VC")
                .join("Auxiliary")
                .join("Build")
                .join("vcvarsall.bat");
            Some(ToolchainInfo::new(version, script, ToolchainSource::Vswhere))
        })
        .collect())
}

/// Find vswhere.exe in standard locations.
#[cfg(target_os = "windows")]
fn find_vswhere() -> Option<PathBuf> {
    let program_files_x86 = std::env::var("ProgramFiles(x86)")
        .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());

    let standard_path = PathBuf::from(&program_files_x86)
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe");

    if standard_path.exists() {
        return Some(standard_path);
    }

    which::which("vswhere").ok()
}

/// Candidates reported by vswhere whose `vcvarsall.bat` exists.
#[cfg(target_os = "windows")]
fn toolchains_from_vswhere() -> Vec<ToolchainInfo> {
    use crate::util::process::ProcessBuilder;

    let Some(vswhere) = find_vswhere() else {
        tracing::debug!("vswhere.exe not found");
        return Vec::new();
    };

    let output = ProcessBuilder::new(&vswhere)
        .args(["-all", "-products", "*", "-format", "json", "-utf8"])
        .exec_and_check();

    let json = match output {
        Ok(out) => String::from_utf8_lossy(&out.stdout).into_owned(),
        Err(e) => {
            tracing::debug!("vswhere failed: {:#}", e);
            return Vec::new();
        }
    };

    match parse_vswhere_json(&json) {
        Ok(found) => found
            .into_iter()
            .filter(|tc| tc.setup_script.exists())
            .collect(),
        Err(e) => {
            tracing::debug!("{:#}", e);
            Vec::new()
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn toolchains_from_vswhere() -> Vec<ToolchainInfo> {
    Vec::new()
}

/// All toolchains visible from `vars` and vswhere, deduplicated by setup
/// script and sorted by version.
pub fn discover_toolchains<I, K, V>(vars: I) -> Vec<ToolchainInfo>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut found = toolchains_from_env(vars);
    found.extend(toolchains_from_vswhere());
    sort_candidates(found)
}

/// Keep the first candidate seen for each setup script, then sort.
fn sort_candidates(found: Vec<ToolchainInfo>) -> Vec<ToolchainInfo> {
    let mut seen = HashSet::new();
    let mut found: Vec<_> = found
        .into_iter()
        .filter(|tc| seen.insert(tc.setup_script.clone()))
        .collect();
    found.sort_by(|a, b| {
        a.version
            .cmp(&b.version)
            .then_with(|| a.setup_script.cmp(&b.setup_script))
    });
    found
}

/// Interpret a 1-based menu answer. `None` for anything out of `1..=len`.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Pick one toolchain.
///
/// A preferred version wins; a single candidate is taken as is; otherwise the
/// operator chooses from a numbered list until the answer is valid.
pub fn select_toolchain(
    mut candidates: Vec<ToolchainInfo>,
    preferred: Option<VsVersion>,
    prompt: &mut impl Interact,
) -> Result<ToolchainInfo> {
    if candidates.is_empty() {
        return Err(BuildError::ToolchainNotFound.into());
    }

    if let Some(version) = preferred {
        return match candidates.iter().position(|tc| tc.version == version) {
            Some(index) => Ok(candidates.swap_remove(index)),
            None => Err(BuildError::ToolchainVersionNotFound {
                requested: version.to_string(),
                available: candidates
                    .iter()
                    .map(|tc| tc.version.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .into()),
        };
    }

    if candidates.len() == 1 {
        return Ok(candidates.swap_remove(0));
    }

    prompt.say("Found the following toolchains:")?;
    for (index, tc) in candidates.iter().enumerate() {
        prompt.say(&format!(
            "{}. VS version {} ({})",
            index + 1,
            tc.version,
            tc.setup_script.display()
        ))?;
    }

    let len = candidates.len();
    let index = prompt.ask_until(&format!("Select a toolchain (1~{}): ", len), |answer| {
        parse_choice(answer, len)
    })?;
    Ok(candidates.swap_remove(index))
}

/// Discover and select a toolchain.
pub fn locate_toolchain<I, K, V>(
    vars: I,
    preferred: Option<VsVersion>,
    prompt: &mut impl Interact,
) -> Result<ToolchainInfo>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let candidates = discover_toolchains(vars);
    tracing::debug!("found {} toolchain candidate(s)", candidates.len());
    select_toolchain(candidates, preferred, prompt)
}
