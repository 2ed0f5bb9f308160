//! Diagnostic request relay.
//!
//! Forwards pprof and expvar requests from the monitor's HTTP front door to
//! the private Unix socket of the sandbox named in the request:
//!
//! ```text
//!  operator ──GET /debug/pprof/heap?sandbox=abc──► shim-monitor
//!                                                     │ resolve abc
//!                                                     ▼
//!                              unix:///run/vc/abc/shim-monitor.sock
//!                                                     │ GET /debug/pprof/heap?sandbox=abc
//!                                                     ▼ Host: shim
//!                                                   shim
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shim_monitor::relay::{Endpoint, RelayClient};
//! use shim_monitor::shim::SocketResolver;
//!
//! let client = RelayClient::new(SocketResolver::default(), timeout, audit);
//! let response = client.relay(Endpoint::Trace, req.uri()).await;
//! ```

pub mod client;
pub mod dial;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod respond;

pub use client::{DEFAULT_DIAL_TIMEOUT, RelayClient, RelayRequest, SHIM_VIRTUAL_HOST};
pub use dial::{AnonDialer, Dialer};
pub use endpoint::{Endpoint, HeaderPreset};
pub use error::{RelayError, RelayResult, SANDBOX_UNAVAILABLE};
pub use respond::{PPROF_ERROR_HEADER, RelayBody, serve_error};
