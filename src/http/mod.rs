//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod cors;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{json_response, redirect_response};
