//! `vcforge toolchain` command

use anyhow::Result;

use crate::cli::ToolchainArgs;
use vcforge::builder::toolchain::discover_toolchains;
use vcforge::core::BuildError;

pub fn execute(args: ToolchainArgs) -> Result<()> {
    let toolchains = discover_toolchains(std::env::vars_os());
    if toolchains.is_empty() {
        return Err(BuildError::ToolchainNotFound.into());
    }

    if args.json {
        let entries: Vec<_> = toolchains
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "version": tc.version.to_string(),
                    "toolset": tc.version.b2_toolset(),
                    "vcvarsall": tc.setup_script.display().to_string(),
                    "source": tc.source.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Toolchains:");
    println!();
    for tc in &toolchains {
        println!("  {:<6} {}", tc.version.to_string(), tc.setup_script.display());
        println!("         from {}", tc.source);
    }
    Ok(())
}
