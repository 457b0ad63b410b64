// API types module
// Request/response bodies of the textbook API

use serde::Serialize;
use serde_json::Value;

/// Liveness probe body
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl HealthStatus {
    pub const HEALTHY: Self = Self { status: "healthy" };
}

/// Chat request
///
/// Only the `message` field is consulted. A missing or non-string
/// `message` reads as the empty string.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    /// Extract the request from a decoded JSON object
    pub fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { message }
    }
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: &'static str,
    /// Reserved for cited material, always empty
    pub sources: Vec<String>,
}

/// Error body, shaped `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
