//! Monitor lifecycle management.
//!
//! Builds the shared components from configuration, runs the front door until
//! SIGINT, then shuts it down.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::monitor::{MonitorConfig, MonitorServer};
use crate::relay::RelayClient;
use crate::telemetry::AuditLogger;

/// Build the audit logger requested by `config`.
///
/// Falls back to a null logger when syslog is unreachable; the relay keeps
/// working without an audit trail.
pub fn build_audit_logger(config: &Config) -> Arc<AuditLogger> {
    if !config.syslog_enabled() {
        return Arc::new(AuditLogger::new_null());
    }

    match AuditLogger::new() {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            warn!("Audit logging disabled: {}", e);
            Arc::new(AuditLogger::new_null())
        }
    }
}

/// Run the monitor until interrupted.
pub fn run(config: &Config) -> Result<()> {
    let listen_address = config.listen_address()?;
    let dial_timeout = config.dial_timeout()?;
    let resolver = config.resolver();

    info!(
        "Relaying to shim sockets under {:?} (dial timeout {:?})",
        resolver.root(),
        dial_timeout
    );

    let audit = build_audit_logger(config);
    let relay = Arc::new(RelayClient::new(resolver, dial_timeout, audit.clone()));

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server = MonitorServer::new(MonitorConfig { listen_address }, relay, audit, shutdown_rx);
        let mut server_handle = tokio::spawn(server.run());

        tokio::select! {
            result = &mut server_handle => {
                // Server stopped on its own, most likely a bind failure
                return result
                    .context("Monitor server task failed")?
                    .context("Monitor server error");
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown requested");
            }
        }

        let _ = shutdown_tx.send(true);
        match tokio::time::timeout(Duration::from_secs(2), server_handle).await {
            Ok(Ok(result)) => result.context("Monitor server error"),
            Ok(Err(e)) => Err(e).context("Monitor server task failed"),
            Err(_) => {
                warn!("Monitor server did not stop in time");
                Ok(())
            }
        }
    })
}
