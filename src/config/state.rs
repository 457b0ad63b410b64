// Application state module
// Read-only state shared by every connection

use hyper::header::HeaderValue;

use super::types::Config;
use crate::error::{Error, Result};
use crate::http::CorsPolicy;

/// Application state
pub struct AppState {
    pub config: Config,
    pub cors: CorsPolicy,
    /// Pre-parsed `Server` header value
    pub server_header: HeaderValue,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let server_header = HeaderValue::from_str(&config.http.server_name).map_err(|_| {
            Error::InvalidHeaderValue {
                field: "http.server_name",
                value: config.http.server_name.clone(),
            }
        })?;

        Ok(Self {
            config: config.clone(),
            cors: CorsPolicy::from_config(&config.cors)?,
            server_header,
        })
    }
}
