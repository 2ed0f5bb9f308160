//! shim-monitor: diagnostic relay for sandbox shims
//!
//! Every sandbox shim serves Go-style runtime diagnostics (pprof profiles,
//! symbol lookup, execution traces, expvar) on a private Unix socket on the
//! host. This crate provides one HTTP front door that forwards a request to
//! the right shim, chosen by the `sandbox` query parameter.
//!
//! # Architecture
//!
//! - **Shim**: sandbox identifiers and socket address resolution
//! - **Relay**: identifier extraction, per-request dial, streamed HTTP relay,
//!   endpoint header presets and uniform error responses
//! - **Monitor**: route table and the HTTP/1.1 server
//! - **Config**: hierarchical TOML configuration
//! - **Telemetry**: structured syslog audit trail

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod cli_handler;
pub mod config;
pub mod monitor;
pub mod orchestrator;
pub mod relay;
pub mod shim;
pub mod telemetry;
