//! Sandbox identifier and shim socket address resolution.
//!
//! Every sandbox shim serves its diagnostic endpoints on a Unix socket at a
//! well-known location derived from the sandbox identifier:
//!
//! ```text
//! unix:///run/vc/<sandbox>/shim-monitor.sock
//! ```
//!
//! Resolution is pure string composition. It never touches the filesystem, so
//! an address for a sandbox that has already stopped resolves just fine and
//! only fails later, when it is dialed.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default directory holding per-sandbox shim state.
pub const DEFAULT_SOCKET_ROOT: &str = "/run/vc";

/// File name of the shim's diagnostic socket inside the sandbox directory.
pub const SHIM_SOCKET_NAME: &str = "shim-monitor.sock";

/// URI scheme prefix of a [`SocketAddress`].
pub const UNIX_SCHEME: &str = "unix://";

/// Reasons a sandbox identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSandboxId {
    /// Identifier is the empty string.
    #[error("sandbox id is empty")]
    Empty,

    /// Identifier would escape or alias its directory.
    #[error("sandbox id {0:?} contains a path separator or NUL byte")]
    Separator(String),

    /// Identifier is `.` or `..`.
    #[error("sandbox id {0:?} is a relative path component")]
    RelativeComponent(String),
}

/// Opaque identifier of a running sandbox.
///
/// Existence is not checked. The only constraint is that the identifier maps
/// to exactly one directory below the socket root, which keeps resolution
/// injective.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SandboxId(String);

impl SandboxId {
    /// Validate and wrap a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidSandboxId> {
        if raw.is_empty() {
            return Err(InvalidSandboxId::Empty);
        }
        if raw.contains('/') || raw.contains('\0') {
            return Err(InvalidSandboxId::Separator(raw.to_string()));
        }
        if raw == "." || raw == ".." {
            return Err(InvalidSandboxId::RelativeComponent(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The identifier as given by the caller.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SandboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of a shim's diagnostic socket, in `unix://<path>` form.
///
/// The socket path is kept as given. The `unix://` string is for display and
/// may be lossy when the path is not valid UTF-8; dialing always uses
/// [`SocketAddress::path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketAddress {
    path: PathBuf,
    uri: String,
}

impl SocketAddress {
    /// Build an address from a socket path.
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            uri: format!("{}{}", UNIX_SCHEME, path.display()),
        }
    }

    /// Full address including the scheme.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Maps sandbox identifiers to shim socket addresses under a fixed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketResolver {
    root: PathBuf,
}

impl SocketResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory under which sandbox socket directories live.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Socket address for `sandbox`. Never fails and never touches the filesystem.
    pub fn resolve(&self, sandbox: &SandboxId) -> SocketAddress {
        SocketAddress::from_path(&self.socket_path(sandbox))
    }

    /// Socket path for `sandbox`, without the scheme.
    pub fn socket_path(&self, sandbox: &SandboxId) -> PathBuf {
        self.root.join(sandbox.as_str()).join(SHIM_SOCKET_NAME)
    }
}

impl Default for SocketResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_ROOT)
    }
}

/// Socket address for `sandbox` under [`DEFAULT_SOCKET_ROOT`].
pub fn socket_address(sandbox: &SandboxId) -> SocketAddress {
    SocketResolver::default().resolve(sandbox)
}
