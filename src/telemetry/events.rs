//! Audit event types for structured logging.
//!
//! These events are logged to syslog with the `SHIM_MONITOR` tag so operators
//! can see which sandboxes were inspected and which relays failed.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Audit events emitted by the monitor.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Monitor started accepting requests.
    MonitorStart {
        /// Address the HTTP front door listens on.
        listen_address: String,
        /// Process ID of the monitor.
        pid: u32,
    },

    /// Monitor stopped.
    MonitorStop {
        /// Address the HTTP front door listened on.
        listen_address: String,
    },

    /// A diagnostic request is being relayed to a shim.
    RelayForward {
        /// Endpoint category (index, cmdline, profile, ...).
        endpoint: String,
        /// Target sandbox.
        sandbox: String,
        /// Socket the request is relayed through.
        socket: String,
        /// Target URI as sent to the shim.
        uri: String,
    },

    /// A request was refused before any dial.
    ///
    /// The reason is internal detail and is never sent to the caller.
    RelayRejected {
        /// Endpoint category.
        endpoint: String,
        /// Why the request was refused.
        reason: String,
    },

    /// The shim could not be reached or did not answer.
    RelayFailed {
        /// Endpoint category.
        endpoint: String,
        /// Target sandbox.
        sandbox: String,
        /// Socket that was dialed.
        socket: String,
        /// Underlying error.
        error: String,
    },

    /// The upstream body failed after the response had started.
    StreamTruncated {
        /// Endpoint category.
        endpoint: String,
        /// Target sandbox.
        sandbox: String,
        /// Socket the body was streamed from.
        socket: String,
        /// Underlying transport error.
        error: String,
    },
}

/// Wrapper for serializing events with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent<'a> {
    /// ISO8601 timestamp.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// The actual event (flattened into this struct).
    #[serde(flatten)]
    pub event: &'a AuditEvent,
}

impl AuditEvent {
    /// Wrap this event with a timestamp for serialization.
    pub fn with_timestamp(&self) -> TimestampedEvent<'_> {
        TimestampedEvent {
            timestamp: Utc::now(),
            event: self,
        }
    }
}
