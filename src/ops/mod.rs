//! High-level operations.
//!
//! This module contains the implementation of vcforge commands.

pub mod boost_build;
pub mod format_all;
pub mod scaffold;

pub use boost_build::{boost_build, BoostOptions, BoostReport};
pub use format_all::{format_all, FormatAllOptions};
pub use scaffold::{scaffold, ScaffoldOptions};
