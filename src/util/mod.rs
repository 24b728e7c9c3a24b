//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod process;
pub mod prompt;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use process::{Executor, SystemExecutor};
pub use prompt::{Interact, Prompt};
pub use shell::Shell;
