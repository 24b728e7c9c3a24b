//! Visual Studio toolchain discovery.
//!
//! Toolchains are found in two places:
//! 1. `VS<nnn>COMNTOOLS` environment variables (pre-2017 installs)
//! 2. `vswhere.exe` from the Visual Studio installer (2017 and later)
//!
//! Either way the result is a [`ToolchainInfo`](crate::core::toolchain::ToolchainInfo)
//! pointing at the install's `vcvarsall.bat`.

pub mod detect;

pub use detect::{
    discover_toolchains, locate_toolchain, parse_choice, parse_vswhere_json, select_toolchain,
    toolchains_from_env,
};
