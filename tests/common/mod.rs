//! Test helpers: a fake shim serving canned responses on a Unix socket.

#![allow(dead_code)]

use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HOST, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use shim_monitor::relay::{AnonDialer, Dialer, RelayBody, RelayClient};
use shim_monitor::shim::{SHIM_SOCKET_NAME, SocketAddress, SocketResolver};
use shim_monitor::telemetry::AuditLogger;
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};

/// Response a fake shim sends for every request.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Bytes,
}

impl Canned {
    pub fn ok(body: &'static [u8]) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: Bytes::from_static(body),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// What the fake shim saw on the wire.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub target: String,
    pub host: Option<String>,
}

/// Handle on a running fake shim.
pub struct FakeShim {
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
    pub accepted: Arc<AtomicUsize>,
}

impl FakeShim {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

fn bind_shim_socket(root: &Path, sandbox: &str) -> UnixListener {
    let dir = root.join(sandbox);
    std::fs::create_dir_all(&dir).unwrap();
    UnixListener::bind(dir.join(SHIM_SOCKET_NAME)).unwrap()
}

/// Serve `canned` on the shim socket of `sandbox` below `root`.
pub fn spawn_shim(root: &Path, sandbox: &str, canned: Canned) -> FakeShim {
    let listener = bind_shim_socket(root, sandbox);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let accepted = Arc::new(AtomicUsize::new(0));

    let shim = FakeShim {
        seen: seen.clone(),
        accepted: accepted.clone(),
    };

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            accepted.fetch_add(1, Ordering::SeqCst);
            let canned = canned.clone();
            let seen = seen.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let canned = canned.clone();
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push(SeenRequest {
                            method: req.method().clone(),
                            target: req.uri().to_string(),
                            host: req
                                .headers()
                                .get(HOST)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string),
                        });

                        let mut response = Response::new(Full::new(canned.body.clone()));
                        *response.status_mut() = canned.status;
                        for (name, value) in &canned.headers {
                            response
                                .headers_mut()
                                .insert(*name, HeaderValue::from_static(value));
                        }
                        Ok::<_, Infallible>(response)
                    }
                });

                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    shim
}

/// Shim that promises `declared_len` body bytes, sends `partial`, then hangs up.
pub fn spawn_truncating_shim(root: &Path, sandbox: &str, declared_len: usize, partial: &'static [u8]) {
    let listener = bind_shim_socket(root, sandbox);

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            // Let the request arrive before answering.
            let mut buf = [0u8; 1024];
            let _ = tokio::io::AsyncReadExt::read(&mut stream, &mut buf).await;

            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
                declared_len
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(partial).await;
            let _ = stream.shutdown().await;
        }
    });
}

/// Dialer that counts dial attempts.
#[derive(Debug, Clone, Default)]
pub struct CountingDialer {
    inner: AnonDialer,
    pub dials: Arc<AtomicUsize>,
}

impl CountingDialer {
    pub fn count(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

impl Dialer for CountingDialer {
    fn dial(
        &self,
        address: &SocketAddress,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<UnixStream>> + Send {
        self.dials.fetch_add(1, Ordering::SeqCst);
        self.inner.dial(address, timeout)
    }
}

/// Relay client rooted at `root` that counts its dials.
pub fn counting_client(root: &Path) -> (RelayClient<CountingDialer>, CountingDialer) {
    let dialer = CountingDialer::default();
    let client = RelayClient::with_dialer(
        SocketResolver::new(root),
        Duration::from_secs(1),
        dialer.clone(),
        Arc::new(AuditLogger::new_null()),
    );
    (client, dialer)
}

/// Formatted log output captured by [`capture_logs`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route debug-and-above logs of the current thread into a buffer.
///
/// Audit events are mirrored there as JSON under the `audit` target. Use with
/// the default current-thread `#[tokio::test]` runtime so spawned tasks log
/// through the same subscriber.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}

/// Drain a relay response.
pub async fn collect(response: Response<RelayBody>) -> (StatusCode, HeaderMap, Bytes) {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    (parts.status, parts.headers, bytes)
}
