//! shim-monitor: diagnostic relay for sandbox shims.
//!
//! Entry point for the shim-monitor binary. Parses the CLI, loads the
//! configuration hierarchy, initializes logging and either runs a subcommand
//! or serves the diagnostic front door until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use shim_monitor::{cli::Cli, cli_handler, config::ConfigLoader, orchestrator};
use tracing::debug;

fn main() -> Result<()> {
    // Parse CLI arguments first (before any other initialization)
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load(&cli)
        .context("Failed to load configuration")?;

    init_tracing(cli.verbose, &config.general.log_level)?;

    debug!("Parsed CLI arguments: {:?}", cli);
    debug!("Loaded configuration: {:?}", config);

    if let Some(command) = cli.command {
        return cli_handler::handle_command(command, &config);
    }

    orchestrator::run(&config)
}

/// Initialize the tracing subscriber for diagnostic logging.
///
/// # Verbosity Levels
/// - 0 (default): `RUST_LOG`, else `general.log_level`, else warn
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8, log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let fallback = if log_level.is_empty() { "warn" } else { log_level };
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
