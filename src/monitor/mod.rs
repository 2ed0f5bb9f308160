//! Monitor HTTP server.
//!
//! The single well-known front door operators use to reach the diagnostic
//! endpoints of every sandbox on the host. See [`routes`] for the path layout.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ServerError;
pub use routes::{Route, route};
pub use server::{DEFAULT_LISTEN_ADDRESS, MonitorConfig, MonitorServer};
