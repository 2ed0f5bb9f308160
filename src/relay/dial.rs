//! Anonymous Unix socket dialing.
//!
//! A dial opens a brand-new connection every time. Shim sockets are recreated
//! when a sandbox restarts, and a kept-alive connection could end up talking
//! to a socket that now belongs to a different sandbox instance.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::net::UnixStream;

use crate::shim::SocketAddress;

/// Opens a connection to a shim socket within a deadline.
pub trait Dialer: Send + Sync + 'static {
    /// Connect to `address`, failing with [`io::ErrorKind::TimedOut`] if the
    /// connection is not established within `timeout`.
    fn dial(
        &self,
        address: &SocketAddress,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<UnixStream>> + Send;
}

/// Dials the socket path directly with no client identity and no reuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonDialer;

impl Dialer for AnonDialer {
    fn dial(
        &self,
        address: &SocketAddress,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<UnixStream>> + Send {
        let path = address.path().to_path_buf();

        async move { within_deadline(&path, timeout, UnixStream::connect(&path)).await }
    }
}

/// Run `connect` for at most `timeout`; an elapsed deadline becomes
/// [`io::ErrorKind::TimedOut`].
async fn within_deadline<T>(
    path: &Path,
    timeout: Duration,
    connect: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    tokio::time::timeout(timeout, connect).await.map_err(|_| {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("dial {} timed out after {:?}", path.display(), timeout),
        )
    })?
}
