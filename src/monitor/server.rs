//! HTTP front door of the monitor.
//!
//! Listens on a TCP address, serves each connection with hyper's HTTP/1.1
//! server in its own Tokio task and dispatches requests through the route
//! table to the shared [`RelayClient`].
//!
//! # Example
//!
//! ```ignore
//! use shim_monitor::monitor::{MonitorConfig, MonitorServer};
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let server = MonitorServer::new(config, relay, audit, shutdown_rx);
//! server.run().await?;
//!
//! // To shutdown:
//! shutdown_tx.send(true)?;
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HeaderValue, LOCATION, X_CONTENT_TYPE_OPTIONS};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::ServerError;
use super::routes::{Route, route};
use crate::relay::endpoint::TEXT_PLAIN_UTF8;
use crate::relay::respond::{empty_body, full_body};
use crate::relay::{AnonDialer, Dialer, RelayBody, RelayClient};
use crate::telemetry::{AuditEvent, AuditLogger};

/// Default front door address.
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:8090";

/// Configuration for the monitor server.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// TCP address to listen on.
    pub listen_address: SocketAddr,
}

/// The monitor's HTTP server.
pub struct MonitorServer<D = AnonDialer> {
    config: MonitorConfig,
    relay: Arc<RelayClient<D>>,
    audit: Arc<AuditLogger>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl<D: Dialer> MonitorServer<D> {
    /// Create a new monitor server.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration.
    /// * `relay` - Relay client shared by all connections.
    /// * `audit` - Audit logger for lifecycle events.
    /// * `shutdown_rx` - Receiver for shutdown signal.
    pub fn new(
        config: MonitorConfig,
        relay: Arc<RelayClient<D>>,
        audit: Arc<AuditLogger>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            relay,
            audit,
            shutdown_rx,
        }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.listen_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener).await
    }

    /// Serve connections from an already bound listener until shutdown.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        info!("Monitor listening on {}", local_addr);
        self.audit.log(AuditEvent::MonitorStart {
            listen_address: local_addr.to_string(),
            pid: std::process::id(),
        });

        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            debug!("Accepted connection from {}", peer);
                            self.spawn_connection_handler(stream);
                        }
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                        }
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Monitor shutting down");
                        break;
                    }
                }
            }
        }

        self.audit.log(AuditEvent::MonitorStop {
            listen_address: local_addr.to_string(),
        });
        Ok(())
    }

    /// Spawn a task to handle a single connection.
    fn spawn_connection_handler(&self, stream: TcpStream) {
        let relay = self.relay.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, relay).await {
                // Don't log connection resets as errors - they're common
                if e.is_incomplete_message() || e.is_canceled() {
                    debug!("Connection ended: {}", e);
                } else {
                    warn!("Connection error: {}", e);
                }
            }
        });
    }
}

/// Handle a single client connection.
async fn handle_connection<D: Dialer>(
    stream: TcpStream,
    relay: Arc<RelayClient<D>>,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let relay = relay.clone();
        async move { dispatch(req, relay).await }
    });

    http1::Builder::new().serve_connection(io, service).await
}

/// Route a single request.
async fn dispatch<D: Dialer>(
    req: Request<Incoming>,
    relay: Arc<RelayClient<D>>,
) -> Result<Response<RelayBody>, Infallible> {
    debug!("{} {}", req.method(), req.uri());

    let response = match route(req.uri().path()) {
        Route::Relay(endpoint) => relay.relay(endpoint, req.uri()).await,
        Route::Redirect(target) => {
            let location = match req.uri().query() {
                Some(query) => format!("{}?{}", target, query),
                None => target.to_string(),
            };
            redirect_response(&location)
        }
        Route::NotFound => not_found_response(),
    };

    Ok(response)
}

/// Create a 301 Moved Permanently response.
fn redirect_response(location: &str) -> Response<RelayBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

/// Create a 404 Not Found response.
fn not_found_response() -> Response<RelayBody> {
    let mut response = Response::new(full_body("404 page not found\n"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_response() {
        let response = not_found_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_redirect_response() {
        let response = redirect_response("/debug/pprof/?sandbox=abc");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/debug/pprof/?sandbox=abc");
    }

    #[test]
    fn test_default_listen_address_parses() {
        assert!(DEFAULT_LISTEN_ADDRESS.parse::<SocketAddr>().is_ok());
    }
}
