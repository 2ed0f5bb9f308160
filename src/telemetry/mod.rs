//! Telemetry and audit logging for shim-monitor.
//!
//! # Architecture
//!
//! - **Audit logging** (syslog): which sandboxes were inspected, which relays
//!   failed and why. Optional, enabled with `audit.syslog = true`.
//! - **Debug logging** (tracing): development logs go to stderr.
//!
//! There is no global logger. Build an [`AuditLogger`] once and pass it to the
//! components that record events:
//!
//! ```ignore
//! use shim_monitor::telemetry::{AuditEvent, AuditLogger};
//! use std::sync::Arc;
//!
//! let audit = Arc::new(AuditLogger::new()?);
//! audit.log(AuditEvent::MonitorStart {
//!     listen_address: "127.0.0.1:8090".to_string(),
//!     pid: std::process::id(),
//! });
//! ```
//!
//! # Event Format
//!
//! ```json
//! {"ts":"2026-01-07T14:32:01Z","event":"relay_failed","endpoint":"profile","sandbox":"abc","socket":"unix:///run/vc/abc/shim-monitor.sock","error":"connection refused"}
//! ```

mod error;
mod events;
mod syslog;

pub use error::TelemetryError;
pub use events::{AuditEvent, TimestampedEvent};
pub use syslog::{AuditLogger, SYSLOG_TAG};
