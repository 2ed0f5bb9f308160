//! Sandbox identifier extraction from inbound requests.

use std::borrow::Cow;

use hyper::Uri;
use percent_encoding::percent_decode_str;

use super::error::RelayError;
use crate::shim::SandboxId;

/// Query parameter carrying the sandbox identifier.
pub const SANDBOX_QUERY_KEY: &str = "sandbox";

/// Pull the sandbox identifier out of the request URI.
///
/// Uses the first `sandbox` query value, percent-decoded as form data. A value
/// that does not decode to valid UTF-8 is rejected rather than replaced, so two
/// different raw identifiers can never end up naming the same sandbox.
pub fn sandbox_id(uri: &Uri) -> Result<SandboxId, RelayError> {
    let query = uri.query().unwrap_or_default();

    let raw = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode_component(key).is_some_and(|key| key == SANDBOX_QUERY_KEY))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            RelayError::IdentifierMissing(format!("sandbox not found in query {:?}", query))
        })?;

    let value = decode_component(raw).ok_or_else(|| {
        RelayError::IdentifierMissing(format!("sandbox {:?} is not valid UTF-8", raw))
    })?;

    SandboxId::parse(&value).map_err(|e| RelayError::IdentifierMissing(e.to_string()))
}

/// Form-decode one query component (`+` is a space), strictly as UTF-8.
fn decode_component(raw: &str) -> Option<Cow<'_, str>> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        return percent_decode_str(&spaced)
            .decode_utf8()
            .ok()
            .map(|decoded| Cow::Owned(decoded.into_owned()));
    }
    percent_decode_str(raw).decode_utf8().ok()
}
