//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber setup from `logging.level` or `RUST_LOG`
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines, filterable as `access=info`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` wins over the
/// configured level when set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(format!("invalid level '{}': {e}", config.level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Textbook API listening on http://{addr}");
    tracing::info!(
        log_level = %config.logging.level,
        access_log = config.logging.access_log,
        access_log_format = %config.logging.access_log_format,
        "Logging configured"
    );
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    if config.cors.enabled {
        tracing::info!("CORS allowed origin: {}", config.cors.allowed_origin);
    }
    tracing::info!("  - GET  http://{addr}/api/health");
    tracing::info!("  - GET  http://{addr}/api/v1/modules");
    tracing::info!("  - POST http://{addr}/api/v1/chat");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("{signal} received, no longer accepting connections");
}

pub fn log_drain_started(active: usize, timeout: Duration) {
    tracing::info!(
        "Waiting up to {}s for {active} active connection(s)",
        timeout.as_secs()
    );
}

pub fn log_drain_finished(remaining: usize) {
    if remaining == 0 {
        tracing::info!("All connections closed, shutting down");
    } else {
        tracing::warn!("Shutdown timeout reached with {remaining} connection(s) still open");
    }
}
