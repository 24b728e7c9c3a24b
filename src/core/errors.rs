//! Error types shared by the build drivers.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions detected by the build drivers.
///
/// Anything else (I/O, spawn failures) travels as `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no Visual Studio toolchain found (looked for VS*COMNTOOLS and vswhere)")]
    ToolchainNotFound,

    #[error("Visual Studio toolchain {requested} not found; available: {available}")]
    ToolchainVersionNotFound { requested: String, available: String },

    #[error("boost directory not found: {}", path.display())]
    BoostDirNotFound { path: PathBuf },

    #[error("build driver `{}` not found; run the bootstrap first", path.display())]
    BuildDriverMissing { path: PathBuf },

    #[error("bootstrap did not produce `{}`", path.display())]
    BootstrapFailed { path: PathBuf },

    #[error("empty toolchain command")]
    EmptyCommand,

    #[error("invalid address model `{0}`; expected 32 or 64")]
    InvalidAddressModel(u32),

    #[error("invalid variant `{0}`; expected `debug` or `release`")]
    InvalidVariant(String),

    #[error("invalid runtime link `{0}`; expected `static` or `shared`")]
    InvalidRuntimeLink(String),

    #[error("input closed while waiting for an answer to `{prompt}`")]
    InputClosed { prompt: String },
}
