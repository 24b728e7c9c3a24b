//! vcforge CLI - Visual Studio build chores from one command line

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use vcforge::util::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; VCFORGE_LOG overrides the verbosity flag
    let filter = EnvFilter::try_from_env("VCFORGE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vcforge=debug")
        } else {
            EnvFilter::new("vcforge=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color));

    // Execute command
    match cli.command {
        Commands::Boost(args) => commands::boost::execute(args, &shell),
        Commands::Format(args) => commands::format::execute(args, &shell),
        Commands::Scaffold(args) => commands::scaffold::execute(args, &shell),
        Commands::Toolchain(args) => commands::toolchain::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
