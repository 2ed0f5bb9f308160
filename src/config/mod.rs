//! Configuration system for shim-monitor.
//!
//! TOML configuration with hierarchy merging:
//!
//! 1. Embedded defaults (`config/default.toml`)
//! 2. System config: `/etc/shim-monitor/config.toml`
//! 3. User config: `~/.config/shim-monitor/config.toml`
//! 4. Additional config file (via `--config` flag)
//! 5. CLI flags (highest priority)
//!
//! ```toml
//! [server]
//! listen_address = "127.0.0.1:8090"
//!
//! [relay]
//! socket_root = "/run/vc"
//! dial_timeout_ms = 3000
//! ```

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{AuditConfig, Config, GeneralConfig, RelayConfig, ServerConfig};
