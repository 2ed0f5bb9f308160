//! Shim socket addressing.
//!
//! Each sandbox's shim serves runtime diagnostics on a Unix socket that only
//! exists on the host. This module knows where that socket lives.
//!
//! ```text
//! ┌──────────────────────── Host ────────────────────────┐
//! │                                                      │
//! │  /run/vc/<sandbox-a>/shim-monitor.sock ◄── shim (a)  │
//! │  /run/vc/<sandbox-b>/shim-monitor.sock ◄── shim (b)  │
//! │                       ▲                              │
//! │                       │ dial per request             │
//! │                ┌──────┴───────┐                      │
//! │                │ shim-monitor │◄── HTTP front door   │
//! │                └──────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod address;

pub use address::{
    DEFAULT_SOCKET_ROOT, InvalidSandboxId, SHIM_SOCKET_NAME, SandboxId, SocketAddress,
    SocketResolver, socket_address,
};
