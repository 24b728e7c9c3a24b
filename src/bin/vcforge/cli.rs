//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vcforge::core::VsVersion;
use vcforge::util::shell::ColorChoice;

/// vcforge - Visual Studio build chores: Boost, clang-format and CMake solutions
#[derive(Parser)]
#[command(name = "vcforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile Boost with b2 for every address model, variant and runtime link
    Boost(BoostArgs),

    /// Run clang-format over C/C++ sources
    Format(FormatArgs),

    /// Clear the build directory and generate a Visual Studio solution
    Scaffold(ScaffoldArgs),

    /// List the Visual Studio toolchains that can be found
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BoostArgs {
    /// Boost source directory (defaults to `.` or `../boost_inuse`)
    #[arg(long, env = "VCFORGE_BOOST_DIR")]
    pub boost_dir: Option<PathBuf>,

    /// Toolset version to use, e.g. 14.0 (skips the toolchain prompt)
    #[arg(long, value_name = "VERSION")]
    pub toolset: Option<VsVersion>,

    /// Address models to build (32, 64)
    #[arg(short, long, value_delimiter = ',')]
    pub address_model: Vec<u32>,

    /// Variants to build (debug, release)
    #[arg(long, value_delimiter = ',')]
    pub variant: Vec<String>,

    /// Runtime links to build (static, shared)
    #[arg(long, value_delimiter = ',')]
    pub runtime_link: Vec<String>,

    /// Libraries to leave out
    #[arg(long, value_delimiter = ',')]
    pub without: Vec<String>,

    /// Choose the libraries to build from b2's list
    #[arg(long)]
    pub select_libs: bool,

    /// Seconds to wait on each job right after launching it
    #[arg(long, value_name = "SECS")]
    pub wait_secs: Option<u64>,
}

#[derive(Args)]
pub struct FormatArgs {
    /// Directories to format (defaults to `projects`)
    pub paths: Vec<PathBuf>,

    /// Formatter executable
    #[arg(long)]
    pub formatter: Option<PathBuf>,

    /// Value passed as -style=
    #[arg(long)]
    pub style: Option<String>,

    /// Number of parallel formatter runs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// List the files without formatting them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ScaffoldArgs {
    /// Project root containing CMakeLists.txt (defaults to current directory)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Solution width (32 or 64); asked for when omitted
    #[arg(long)]
    pub arch: Option<u32>,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// Print the toolchains as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
