//! Boost compile job parameters.
//!
//! A [`CompileJob`] is one `(address-model, variant, runtime-link)` combination.
//! Construction validates every parameter, so a job that exists is always
//! launchable.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::BuildError;

/// Target address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressModel {
    X86,
    X64,
}

impl AddressModel {
    /// Address width in bits.
    pub fn bits(&self) -> u32 {
        match self {
            AddressModel::X86 => 32,
            AddressModel::X64 => 64,
        }
    }

    /// Platform argument for `vcvarsall.bat`.
    pub fn platform(&self) -> &'static str {
        match self {
            AddressModel::X86 => "x86",
            AddressModel::X64 => "x64",
        }
    }

    /// Name of the width-specific zlib directory.
    pub fn zlib_dir_name(&self) -> &'static str {
        match self {
            AddressModel::X86 => "win32",
            AddressModel::X64 => "win64",
        }
    }
}

impl TryFrom<u32> for AddressModel {
    type Error = BuildError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(AddressModel::X86),
            64 => Ok(AddressModel::X64),
            other => Err(BuildError::InvalidAddressModel(other)),
        }
    }
}

impl fmt::Display for AddressModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Debug,
    Release,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Debug => "debug",
            Variant::Release => "release",
        }
    }
}

impl FromStr for Variant {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Variant::Debug),
            "release" => Ok(Variant::Release),
            other => Err(BuildError::InvalidVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the C++ runtime is linked into the produced libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeLink {
    Static,
    Shared,
}

impl RuntimeLink {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeLink::Static => "static",
            RuntimeLink::Shared => "shared",
        }
    }
}

impl FromStr for RuntimeLink {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(RuntimeLink::Static),
            "shared" => Ok(RuntimeLink::Shared),
            other => Err(BuildError::InvalidRuntimeLink(other.to_string())),
        }
    }
}

impl fmt::Display for RuntimeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Boost compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompileJob {
    pub address_model: AddressModel,
    pub variant: Variant,
    pub runtime_link: RuntimeLink,
}

impl CompileJob {
    /// Validate raw parameters into a job.
    pub fn new(address_model: u32, variant: &str, runtime_link: &str) -> Result<Self, BuildError> {
        Ok(CompileJob {
            address_model: AddressModel::try_from(address_model)?,
            variant: variant.parse()?,
            runtime_link: runtime_link.parse()?,
        })
    }

    /// Platform name (`x86` / `x64`).
    pub fn platform(&self) -> &'static str {
        self.address_model.platform()
    }

    /// Log file name, unique per job.
    pub fn log_file_name(&self) -> String {
        format!(
            "compile_{}_{}_{}.log",
            self.platform(),
            self.variant,
            self.runtime_link
        )
    }
}

impl fmt::Display for CompileJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} runtime-link={}",
            self.platform(),
            self.variant,
            self.runtime_link
        )
    }
}

/// Expand raw job parameters into the full job list.
///
/// Order is address model first, then variant, then runtime link, so the
/// default lists give `(32,debug)`, `(32,release)`, `(64,debug)`, `(64,release)`.
/// The first invalid value aborts the whole expansion.
pub fn expand_jobs(
    address_models: &[u32],
    variants: &[String],
    runtime_links: &[String],
) -> Result<Vec<CompileJob>, BuildError> {
    let mut jobs = Vec::with_capacity(address_models.len() * variants.len() * runtime_links.len());
    for &bits in address_models {
        for variant in variants {
            for link in runtime_links {
                jobs.push(CompileJob::new(bits, variant, link)?);
            }
        }
    }
    Ok(jobs)
}
