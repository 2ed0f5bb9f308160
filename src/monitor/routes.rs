//! Route table of the monitor's diagnostic front door.
//!
//! Mirrors the conventional Go debug layout:
//!
//! | Path | Endpoint |
//! |---|---|
//! | `/debug/vars` | [`Endpoint::Vars`] |
//! | `/debug/pprof/cmdline` | [`Endpoint::Cmdline`] |
//! | `/debug/pprof/profile` | [`Endpoint::Profile`] |
//! | `/debug/pprof/symbol` | [`Endpoint::Symbol`] |
//! | `/debug/pprof/trace` | [`Endpoint::Trace`] |
//! | `/debug/pprof/...` | [`Endpoint::Index`] (named profiles such as `heap`) |

use crate::relay::Endpoint;

/// Exported variables.
pub const VARS_PATH: &str = "/debug/vars";
/// Profile index; also the prefix for named profiles.
pub const PPROF_PREFIX: &str = "/debug/pprof/";
/// Command line.
pub const CMDLINE_PATH: &str = "/debug/pprof/cmdline";
/// CPU profile.
pub const PROFILE_PATH: &str = "/debug/pprof/profile";
/// Symbol lookup.
pub const SYMBOL_PATH: &str = "/debug/pprof/symbol";
/// Execution trace.
pub const TRACE_PATH: &str = "/debug/pprof/trace";

/// Outcome of matching a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Relay to the shim as this endpoint.
    Relay(Endpoint),
    /// Permanent redirect to the canonical path.
    Redirect(&'static str),
    /// Nothing served here.
    NotFound,
}

/// Match `path` against the route table.
pub fn route(path: &str) -> Route {
    match path {
        VARS_PATH => Route::Relay(Endpoint::Vars),
        CMDLINE_PATH => Route::Relay(Endpoint::Cmdline),
        PROFILE_PATH => Route::Relay(Endpoint::Profile),
        SYMBOL_PATH => Route::Relay(Endpoint::Symbol),
        TRACE_PATH => Route::Relay(Endpoint::Trace),
        "/debug/pprof" => Route::Redirect(PPROF_PREFIX),
        _ if path.starts_with(PPROF_PREFIX) => Route::Relay(Endpoint::Index),
        _ => Route::NotFound,
    }
}

/// Path serving `endpoint`.
pub fn path_for(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Index => PPROF_PREFIX,
        Endpoint::Cmdline => CMDLINE_PATH,
        Endpoint::Profile => PROFILE_PATH,
        Endpoint::Symbol => SYMBOL_PATH,
        Endpoint::Trace => TRACE_PATH,
        Endpoint::Vars => VARS_PATH,
    }
}
