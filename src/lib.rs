//! vcforge - Visual Studio build chores from one command line
//!
//! This crate provides the library behind the `vcforge` binary: locating
//! Visual Studio toolchains, compiling Boost with b2, running clang-format
//! over source trees, and generating Visual Studio solutions with CMake.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for vcforge unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording executor that never spawns
/// processes, a scripted prompt, and filesystem fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildError, CompileJob, ToolchainInfo, VsVersion};
pub use util::context::GlobalContext;
