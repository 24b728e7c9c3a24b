//! Drivers for the external build tools.
//!
//! Each submodule wraps one tool: b2 for Boost, clang-format for sources and
//! CMake for Visual Studio solutions. The toolchain module finds the
//! `vcvarsall.bat` the Boost driver runs under.

pub mod boost;
pub mod cmake;
pub mod format;
pub mod toolchain;

pub use boost::{BoostTree, CompileCommand, LibrarySelection};
pub use cmake::SolutionGenerator;
pub use format::{FormatOptions, FormatSummary};
pub use toolchain::locate_toolchain;
