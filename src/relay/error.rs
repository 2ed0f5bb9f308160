//! Error types for relay operations.
//!
//! - Identifier errors (missing or malformed `sandbox` parameter)
//! - Upstream errors (dial failure, shim not answering)
//!
//! Each variant knows the status code and the caller-facing message it turns
//! into. The caller-facing message for a missing identifier is deliberately
//! generic; the real cause stays in the logs.

use hyper::StatusCode;
use thiserror::Error;

use crate::shim::SocketAddress;

/// Message sent to callers whose request did not name a usable sandbox.
pub const SANDBOX_UNAVAILABLE: &str = "sandbox may be stopped or deleted";

/// Unified error type for relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Sandbox identifier absent or unparsable.
    #[error("sandbox identifier missing: {0}")]
    IdentifierMissing(String),

    /// Dial to the shim socket failed or timed out.
    #[error("failed to dial {address} for {uri}: {source}")]
    UpstreamUnreachable {
        /// Target URI as it would have been sent.
        uri: String,
        /// Socket that was dialed.
        address: SocketAddress,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Connected, but the HTTP exchange failed before a response arrived.
    #[error("failed to request {uri} through {address}: {source}")]
    Exchange {
        /// Target URI.
        uri: String,
        /// Socket the exchange ran over.
        address: SocketAddress,
        /// The underlying hyper error.
        #[source]
        source: hyper::Error,
    },

    /// The outbound request could not be built.
    #[error("invalid upstream request: {0}")]
    Request(#[from] hyper::http::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Status code reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::IdentifierMissing(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message reported to the caller.
    ///
    /// Upstream failures name the URI and socket; both are useful when
    /// debugging a broken shim and neither is secret.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::IdentifierMissing(_) => SANDBOX_UNAVAILABLE.to_string(),
            RelayError::UpstreamUnreachable { uri, address, .. }
            | RelayError::Exchange { uri, address, .. } => {
                format!("failed to request {} through {}", uri, address)
            }
            RelayError::Request(_) => "failed to build upstream request".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_identifier_missing_is_bad_request() {
        let err = RelayError::IdentifierMissing("no sandbox query parameter".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), SANDBOX_UNAVAILABLE);
        assert!(err.to_string().contains("no sandbox query parameter"));
    }

    #[test]
    fn test_upstream_unreachable_message() {
        let err = RelayError::UpstreamUnreachable {
            uri: "http://shim/debug/vars?sandbox=abc".to_string(),
            address: SocketAddress::from_path(Path::new("/run/vc/abc/shim-monitor.sock")),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = err.public_message();
        assert!(message.contains("http://shim/debug/vars?sandbox=abc"));
        assert!(message.contains("unix:///run/vc/abc/shim-monitor.sock"));
        assert!(!message.contains("refused"));
    }
}
