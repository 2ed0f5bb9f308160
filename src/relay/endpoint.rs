//! Diagnostic endpoint categories and their header presets.
//!
//! All six endpoints share one relay path. They differ only in the headers
//! set before the upstream answers; a preset header always wins over the
//! upstream's value for the same header.

use hyper::HeaderMap;
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName, HeaderValue};

/// `Content-Type` forced on symbol table responses.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// `Content-Type` forced on execution trace responses.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// `Content-Disposition` forced on execution trace responses.
pub const TRACE_ATTACHMENT: &str = "attachment; filename=\"trace\"";

/// Diagnostic views a shim exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Profile index and named profiles (`/debug/pprof/`).
    Index,
    /// Process command line.
    Cmdline,
    /// CPU profile.
    Profile,
    /// Symbol table lookup.
    Symbol,
    /// Execution trace.
    Trace,
    /// Exported variables (`/debug/vars`).
    Vars,
}

impl Endpoint {
    /// Every endpoint, in route-table order.
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Index,
        Endpoint::Cmdline,
        Endpoint::Profile,
        Endpoint::Symbol,
        Endpoint::Trace,
        Endpoint::Vars,
    ];

    /// Short name used in logs and audit events.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::Cmdline => "cmdline",
            Endpoint::Profile => "profile",
            Endpoint::Symbol => "symbol",
            Endpoint::Trace => "trace",
            Endpoint::Vars => "vars",
        }
    }

    /// Headers this endpoint sets regardless of the upstream.
    pub fn preset(self) -> HeaderPreset {
        match self {
            Endpoint::Symbol => HeaderPreset {
                content_type: Some(TEXT_PLAIN_UTF8),
                content_disposition: None,
            },
            Endpoint::Trace => HeaderPreset {
                content_type: Some(OCTET_STREAM),
                content_disposition: Some(TRACE_ATTACHMENT),
            },
            _ => HeaderPreset::NONE,
        }
    }
}

/// Response headers an endpoint pins before relaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderPreset {
    /// Forced `Content-Type`.
    pub content_type: Option<&'static str>,
    /// Forced `Content-Disposition`.
    pub content_disposition: Option<&'static str>,
}

impl HeaderPreset {
    /// Preset that pins nothing.
    pub const NONE: HeaderPreset = HeaderPreset {
        content_type: None,
        content_disposition: None,
    };

    /// Write the preset headers into `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(value) = self.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        }
        if let Some(value) = self.content_disposition {
            headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static(value));
        }
    }

    /// Whether the preset pins `name`, so the upstream value must be ignored.
    pub fn pins(&self, name: &HeaderName) -> bool {
        (name == CONTENT_TYPE && self.content_type.is_some())
            || (name == CONTENT_DISPOSITION && self.content_disposition.is_some())
    }
}
