//! Core data structures for vcforge.
//!
//! - Visual Studio toolchain descriptions
//! - Boost compile jobs (address model, variant, runtime link)
//! - The error taxonomy shared by the drivers

pub mod errors;
pub mod job;
pub mod toolchain;

pub use errors::BuildError;
pub use job::{expand_jobs, AddressModel, CompileJob, RuntimeLink, Variant};
pub use toolchain::{ToolchainInfo, ToolchainSource, VsVersion};
