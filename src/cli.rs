//! Command-line interface definitions for shim-monitor.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Diagnostic relay for sandbox shims.
///
/// shim-monitor exposes one HTTP front door through which the pprof and
/// expvar endpoints of every sandbox shim on the host can be reached. Name the
/// sandbox with the `sandbox` query parameter, e.g.
/// `curl 'http://127.0.0.1:8090/debug/pprof/heap?sandbox=<id>'`.
#[derive(Parser, Debug)]
#[command(name = "shim-monitor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (or omit to serve).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to additional config file.
    ///
    /// Merged on top of system and user configs, giving it the highest
    /// priority except for CLI flags.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address of the diagnostic front door (e.g. 127.0.0.1:8090).
    #[arg(short = 'l', long = "listen-address", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Directory containing the per-sandbox shim socket directories.
    #[arg(long = "socket-root", value_name = "DIR")]
    pub socket_root: Option<PathBuf>,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Subcommands for shim-monitor.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the shim socket address for a sandbox without dialing it.
    Resolve {
        /// Sandbox identifier.
        #[arg(required = true)]
        sandbox: String,
    },
}
