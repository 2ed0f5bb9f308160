//! Configuration schema definitions.
//!
//! Every field is optional in a config file. An unset field (empty string,
//! zero, or `None`) leaves the value from a lower-priority source untouched
//! when configs are merged.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;
use crate::shim::{DEFAULT_SOCKET_ROOT, SocketResolver};

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Front door settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Shim relay settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Config {
    /// Merge another config into this one.
    ///
    /// Scalars are overridden when set in `other`.
    pub fn merge(&mut self, other: Config) {
        self.general.merge(other.general);
        self.server.merge(other.server);
        self.relay.merge(other.relay);
        self.audit.merge(other.audit);
    }

    /// Parsed front door address.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen_address
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                field: "server.listen_address".to_string(),
                message: format!("{:?}: {}", self.server.listen_address, e),
            })
    }

    /// Dial timeout for shim sockets.
    pub fn dial_timeout(&self) -> Result<Duration, ConfigError> {
        if self.relay.dial_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "relay.dial_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(Duration::from_millis(self.relay.dial_timeout_ms))
    }

    /// Resolver for the configured socket root.
    pub fn resolver(&self) -> SocketResolver {
        match &self.relay.socket_root {
            Some(root) => SocketResolver::new(root),
            None => SocketResolver::new(DEFAULT_SOCKET_ROOT),
        }
    }

    /// Whether audit events go to syslog.
    pub fn syslog_enabled(&self) -> bool {
        self.audit.syslog.unwrap_or(false)
    }
}

/// General application settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub log_level: String,
}

impl GeneralConfig {
    fn merge(&mut self, other: GeneralConfig) {
        if !other.log_level.is_empty() {
            self.log_level = other.log_level;
        }
    }
}

/// Front door configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    /// TCP address to listen on, e.g. `127.0.0.1:8090`.
    #[serde(default)]
    pub listen_address: String,
}

impl ServerConfig {
    fn merge(&mut self, other: ServerConfig) {
        if !other.listen_address.is_empty() {
            self.listen_address = other.listen_address;
        }
    }
}

/// Shim relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RelayConfig {
    /// Directory containing one sub-directory per sandbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_root: Option<PathBuf>,

    /// Timeout for connecting to a shim socket in milliseconds.
    #[serde(default)]
    pub dial_timeout_ms: u64,
}

impl RelayConfig {
    fn merge(&mut self, other: RelayConfig) {
        if other.socket_root.is_some() {
            self.socket_root = other.socket_root;
        }
        if other.dial_timeout_ms != 0 {
            self.dial_timeout_ms = other.dial_timeout_ms;
        }
    }
}

/// Audit trail configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuditConfig {
    /// Send audit events to syslog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog: Option<bool>,
}

impl AuditConfig {
    fn merge(&mut self, other: AuditConfig) {
        if other.syslog.is_some() {
            self.syslog = other.syslog;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();

        assert_eq!(config.general.log_level, "");
        assert_eq!(config.server.listen_address, "");
        assert!(config.relay.socket_root.is_none());
        assert_eq!(config.relay.dial_timeout_ms, 0);
        assert!(!config.syslog_enabled());
    }

    #[test]
    fn test_config_merge_scalars() {
        let mut base = Config {
            server: ServerConfig {
                listen_address: "127.0.0.1:8090".to_string(),
            },
            relay: RelayConfig {
                socket_root: Some(PathBuf::from("/run/vc")),
                dial_timeout_ms: 3000,
            },
            ..Default::default()
        };

        base.merge(Config {
            relay: RelayConfig {
                socket_root: None,
                dial_timeout_ms: 500,
            },
            audit: AuditConfig { syslog: Some(true) },
            ..Default::default()
        });

        assert_eq!(base.server.listen_address, "127.0.0.1:8090");
        assert_eq!(base.relay.socket_root, Some(PathBuf::from("/run/vc")));
        assert_eq!(base.relay.dial_timeout_ms, 500);
        assert!(base.syslog_enabled());
    }

    #[test]
    fn test_syslog_can_be_turned_off() {
        let mut base = Config {
            audit: AuditConfig { syslog: Some(true) },
            ..Default::default()
        };
        base.merge(Config {
            audit: AuditConfig {
                syslog: Some(false),
            },
            ..Default::default()
        });

        assert!(!base.syslog_enabled());
    }

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
            [server]
            listen_address = "0.0.0.0:9000"

            [relay]
            socket_root = "/tmp/vc"
            dial_timeout_ms = 250
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.listen_address().unwrap().port(), 9000);
        assert_eq!(config.dial_timeout().unwrap(), Duration::from_millis(250));
        assert_eq!(config.resolver().root(), Path::new("/tmp/vc"));
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = Config {
            server: ServerConfig {
                listen_address: "not-an-address".to_string(),
            },
            ..Default::default()
        };

        match config.listen_address() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "server.listen_address");
            }
            other => unreachable!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_dial_timeout_is_invalid() {
        assert!(Config::default().dial_timeout().is_err());
    }

    #[test]
    fn test_resolver_defaults_to_run_vc() {
        assert_eq!(Config::default().resolver().root(), Path::new("/run/vc"));
    }
}
