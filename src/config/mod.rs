// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use hyper::header::HeaderValue;

use crate::error::{Error, Result};

// Re-export public types
pub use state::AppState;
pub use types::{Config, CorsConfig, LoggingConfig};

/// Environment variable naming the config file (extension optional)
pub const CONFIG_PATH_ENV: &str = "TEXTBOOK_CONFIG";

/// Prefix for per-key environment overrides, e.g. `TEXTBOOK_API__SERVER__PORT`
const ENV_PREFIX: &str = "TEXTBOOK_API";

impl Config {
    /// Load configuration from the path in `TEXTBOOK_CONFIG`, or `config`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path
    /// The file is optional; defaults cover every key
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 5)?
            .set_default("http.server_name", "textbook-api")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("cors.enabled", true)?
            .set_default("cors.allowed_origin", "http://localhost:3000")?
            .set_default("cors.allow_credentials", true)?
            .set_default("cors.max_age", 600)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would only fail later, while serving
    pub fn validate(&self) -> Result<()> {
        self.get_socket_addr()?;
        if self.server.workers == Some(0) {
            return Err(Error::InvalidSetting {
                field: "server.workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if HeaderValue::from_str(&self.http.server_name).is_err() {
            return Err(Error::InvalidHeaderValue {
                field: "http.server_name",
                value: self.http.server_name.clone(),
            });
        }
        if self.cors.enabled && HeaderValue::from_str(&self.cors.allowed_origin).is_err() {
            return Err(Error::InvalidHeaderValue {
                field: "cors.allowed_origin",
                value: self.cors.allowed_origin.clone(),
            });
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| Error::InvalidAddress { addr, source })
    }
}
