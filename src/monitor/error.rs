//! Error types for the monitor server.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors that stop the monitor server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the front door listener.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// The address we tried to bind to.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error on the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
