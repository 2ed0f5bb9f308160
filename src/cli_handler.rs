//! Subcommand handling for shim-monitor.

use anyhow::{Context, Result};

use crate::cli::Commands;
use crate::config::Config;
use crate::shim::SandboxId;

/// Handle subcommands.
pub fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Resolve { sandbox } => {
            println!("{}", resolve(&sandbox, config)?);
            Ok(())
        }
    }
}

/// Socket address the relay would dial for `sandbox`.
fn resolve(sandbox: &str, config: &Config) -> Result<String> {
    let sandbox = SandboxId::parse(sandbox).context("Invalid sandbox id")?;
    Ok(config.resolver().resolve(&sandbox).to_string())
}
