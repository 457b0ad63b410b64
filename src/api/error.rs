// API error module
// Request rejections raised before a handler produces its answer

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Response, StatusCode};
use thiserror::Error;

use super::types::ErrorBody;
use crate::http::json_response;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to read request body")]
    BodyRead,

    #[error("{0}")]
    InvalidBody(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BodyRead => StatusCode::BAD_REQUEST,
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Render as a JSON `{"detail": ...}` response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut resp = json_response(
            self.status(),
            &ErrorBody {
                detail: self.to_string(),
            },
        );
        if let Self::MethodNotAllowed { allow } = self {
            resp.headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        resp
    }
}
