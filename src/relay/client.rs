//! Per-request relay to a sandbox shim.
//!
//! The flow for every inbound request is:
//!
//! 1. Pin the endpoint's preset headers
//! 2. Extract the sandbox identifier from the query string
//! 3. Resolve the shim socket address
//! 4. Dial a fresh connection and send one `GET` with `Host: shim`
//! 5. Stream the upstream status, allow-listed headers and body back
//!
//! Any failure up to and including step 4 turns into a plain-text error
//! response. Once the upstream body is streaming there is no way to change the
//! status, so a transport error at that point only truncates the response and
//! is logged.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper::header::{
    CONNECTION, CONTENT_DISPOSITION, CONTENT_TYPE, HOST, HeaderValue, X_CONTENT_TYPE_OPTIONS,
};
use hyper::{HeaderMap, Method, Request, Response, Uri};
use hyper_util::rt::TokioIo;
use tracing::{debug, warn};

use super::dial::{AnonDialer, Dialer};
use super::endpoint::{Endpoint, HeaderPreset};
use super::error::{RelayError, RelayResult};
use super::extract;
use super::respond::{RelayBody, serve_error};
use crate::shim::{SandboxId, SocketAddress, SocketResolver};
use crate::telemetry::{AuditEvent, AuditLogger};

/// Virtual host name sent to shims. The socket already identifies the target.
pub const SHIM_VIRTUAL_HOST: &str = "shim";

/// Dial timeout used when none is configured.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// One outbound exchange: what to ask for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    path_and_query: String,
    address: SocketAddress,
}

impl RelayRequest {
    /// Copy the path and query of `inbound` unchanged and pair it with `address`.
    pub fn new(inbound: &Uri, address: SocketAddress) -> Self {
        let path_and_query = inbound
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();

        Self {
            path_and_query,
            address,
        }
    }

    /// Request target sent on the wire.
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    /// Shim socket the request goes through.
    pub fn address(&self) -> &SocketAddress {
        &self.address
    }

    /// Full URI as the shim sees it, used in logs and error messages.
    pub fn uri(&self) -> String {
        format!("http://{}{}", SHIM_VIRTUAL_HOST, self.path_and_query)
    }
}

/// Relays diagnostic requests to sandbox shims.
///
/// Holds no per-request state and no connections, so one instance is shared
/// by all request tasks.
pub struct RelayClient<D = AnonDialer> {
    resolver: SocketResolver,
    dial_timeout: Duration,
    dialer: D,
    audit: Arc<AuditLogger>,
}

impl RelayClient<AnonDialer> {
    /// Create a relay client that dials shim sockets directly.
    pub fn new(resolver: SocketResolver, dial_timeout: Duration, audit: Arc<AuditLogger>) -> Self {
        Self::with_dialer(resolver, dial_timeout, AnonDialer, audit)
    }
}

impl<D: Dialer> RelayClient<D> {
    /// Create a relay client with a custom dialer.
    pub fn with_dialer(
        resolver: SocketResolver,
        dial_timeout: Duration,
        dialer: D,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            resolver,
            dial_timeout,
            dialer,
            audit,
        }
    }

    /// Resolver used to find shim sockets.
    pub fn resolver(&self) -> &SocketResolver {
        &self.resolver
    }

    /// Upper bound on establishing a shim connection.
    pub fn dial_timeout(&self) -> Duration {
        self.dial_timeout
    }

    /// Relay `uri` to the shim of the sandbox it names.
    ///
    /// Always produces a response: either the streamed upstream response or a
    /// plain-text error.
    pub async fn relay(&self, endpoint: Endpoint, uri: &Uri) -> Response<RelayBody> {
        let preset = endpoint.preset();

        let mut headers = HeaderMap::new();
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        preset.apply(&mut headers);

        let sandbox = match extract::sandbox_id(uri) {
            Ok(sandbox) => sandbox,
            Err(e) => {
                warn!(endpoint = endpoint.name(), "Failed to get shim monitor address: {}", e);
                self.audit.log(AuditEvent::RelayRejected {
                    endpoint: endpoint.name().to_string(),
                    reason: e.to_string(),
                });
                return serve_error(headers, e.status(), &e.public_message());
            }
        };

        let request = RelayRequest::new(uri, self.resolver.resolve(&sandbox));
        debug!(
            "Relaying {} request to {}, uri: {}",
            endpoint.name(),
            request.address(),
            request.uri()
        );
        self.audit.log(AuditEvent::RelayForward {
            endpoint: endpoint.name().to_string(),
            sandbox: sandbox.to_string(),
            socket: request.address().to_string(),
            uri: request.uri(),
        });

        match self.exchange(&request).await {
            Ok(upstream) => self.forward(upstream, headers, preset, endpoint, &sandbox, &request),
            Err(e) => {
                warn!(endpoint = endpoint.name(), sandbox = %sandbox, "{}", e);
                self.audit.log(AuditEvent::RelayFailed {
                    endpoint: endpoint.name().to_string(),
                    sandbox: sandbox.to_string(),
                    socket: request.address().to_string(),
                    error: e.to_string(),
                });
                serve_error(headers, e.status(), &e.public_message())
            }
        }
    }

    /// Dial the shim and perform a single `GET`, returning once response
    /// headers have arrived.
    pub async fn exchange(&self, request: &RelayRequest) -> RelayResult<Response<Incoming>> {
        let stream = self
            .dialer
            .dial(request.address(), self.dial_timeout)
            .await
            .map_err(|source| RelayError::UpstreamUnreachable {
                uri: request.uri(),
                address: request.address().clone(),
                source,
            })?;

        let (mut sender, conn) =
            hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(TokioIo::new(stream))
                .await
                .map_err(|source| RelayError::Exchange {
                    uri: request.uri(),
                    address: request.address().clone(),
                    source,
                })?;

        // The driver ends when the body is fully read or dropped.
        let address = request.address().clone();
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!("Shim connection {} ended: {}", address, e);
            }
        });

        let outbound = Request::builder()
            .method(Method::GET)
            .uri(request.path_and_query())
            .header(HOST, SHIM_VIRTUAL_HOST)
            .header(CONNECTION, "close")
            .body(Empty::<Bytes>::new())?;

        sender
            .send_request(outbound)
            .await
            .map_err(|source| RelayError::Exchange {
                uri: request.uri(),
                address: request.address().clone(),
                source,
            })
    }

    /// Turn the upstream response into the caller's response.
    fn forward(
        &self,
        upstream: Response<Incoming>,
        mut headers: HeaderMap,
        preset: HeaderPreset,
        endpoint: Endpoint,
        sandbox: &SandboxId,
        request: &RelayRequest,
    ) -> Response<RelayBody> {
        let (parts, body) = upstream.into_parts();

        for name in [CONTENT_TYPE, CONTENT_DISPOSITION] {
            if preset.pins(&name) {
                continue;
            }
            if let Some(value) = parts.headers.get(&name)
                && !value.is_empty()
            {
                headers.insert(name, value.clone());
            }
        }

        let audit = self.audit.clone();
        let endpoint = endpoint.name();
        let sandbox = sandbox.to_string();
        let socket = request.address().to_string();
        let body = body
            .map_err(move |e| {
                warn!(
                    endpoint,
                    sandbox = %sandbox,
                    "Upstream body from {} failed mid-stream, response truncated: {}",
                    socket,
                    e
                );
                audit.log(AuditEvent::StreamTruncated {
                    endpoint: endpoint.to_string(),
                    sandbox: sandbox.clone(),
                    socket: socket.clone(),
                    error: e.to_string(),
                });
                e
            })
            .boxed();

        let mut response = Response::new(body);
        *response.status_mut() = parts.status;
        *response.headers_mut() = headers;
        response
    }
}
