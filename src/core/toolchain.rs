//! Visual Studio toolchain descriptions.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A Visual C++ toolset version, stored in tenths (`140` is `14.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VsVersion(u32);

impl VsVersion {
    /// Create a version from its tenths representation (`VS140COMNTOOLS` -> `140`).
    pub fn from_tenths(tenths: u32) -> Self {
        VsVersion(tenths)
    }

    /// The `msvc-X.Y` toolset name understood by b2.
    pub fn b2_toolset(&self) -> String {
        format!("msvc-{}", self)
    }
}

impl fmt::Display for VsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl FromStr for VsVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid toolset version '{}'; expected e.g. '14.0'", s);
        let s = s.trim();
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };
        let major: u32 = major.parse().map_err(|_| invalid())?;
        if minor.len() != 1 {
            return Err(invalid());
        }
        let minor: u32 = minor.parse().map_err(|_| invalid())?;
        major
            .checked_mul(10)
            .and_then(|tenths| tenths.checked_add(minor))
            .map(VsVersion)
            .ok_or_else(invalid)
    }
}

/// Where a toolchain was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainSource {
    /// A `VS<nnn>COMNTOOLS` environment variable.
    Environment(String),
    /// The Visual Studio installer's `vswhere.exe`.
    Vswhere,
}

impl fmt::Display for ToolchainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolchainSource::Environment(var) => write!(f, "%{}%", var),
            ToolchainSource::Vswhere => write!(f, "vswhere"),
        }
    }
}

/// A discovered toolchain: its version and the `vcvarsall.bat` that sets it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInfo {
    pub version: VsVersion,
    pub setup_script: PathBuf,
    pub source: ToolchainSource,
}

impl ToolchainInfo {
    pub fn new(version: VsVersion, setup_script: PathBuf, source: ToolchainSource) -> Self {
        ToolchainInfo {
            version,
            setup_script,
            source,
        }
    }

    /// Path to the setup script.
    pub fn setup_script(&self) -> &Path {
        &self.setup_script
    }

    /// The shell invocation that loads this toolchain, without a platform argument.
    ///
    /// `call "C:\...\vcvarsall.bat"`
    pub fn setup_invocation(&self) -> String {
        format!("call \"{}\"", self.setup_script.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(VsVersion::from_tenths(140).to_string(), "14.0");
        assert_eq!(VsVersion::from_tenths(90).to_string(), "9.0");
        assert_eq!(VsVersion::from_tenths(143).to_string(), "14.3");
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("14.0".parse::<VsVersion>().unwrap(), VsVersion::from_tenths(140));
        assert_eq!("14".parse::<VsVersion>().unwrap(), VsVersion::from_tenths(140));
        assert_eq!("14.2".parse::<VsVersion>().unwrap(), VsVersion::from_tenths(142));
        assert!("14.25".parse::<VsVersion>().is_err());
        assert!("vs2015".parse::<VsVersion>().is_err());
        assert!("999999999.0".parse::<VsVersion>().is_err());
        assert!("4294967295".parse::<VsVersion>().is_err());
    }

    #[test]
    fn test_b2_toolset() {
        assert_eq!(VsVersion::from_tenths(140).b2_toolset(), "msvc-14.0");
    }

    #[test]
    fn test_setup_invocation_quotes_path() {
        let info = ToolchainInfo::new(
            VsVersion::from_tenths(140),
            PathBuf::from("C:/VS 14/VC/vcvarsall.bat"),
            ToolchainSource::Vswhere,
        );
        assert_eq!(info.setup_invocation(), "call \"C:/VS 14/VC/vcvarsall.bat\"");
    }
}
