// Textbook API handlers module

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;

use super::error::ApiError;
use super::types::{ChatRequest, ChatResponse, HealthStatus};
use crate::content;
use crate::http::json_response;
use crate::logger;

/// `GET /api/health`
pub fn health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HealthStatus::HEALTHY)
}

/// `GET /api/v1/modules`
pub fn list_modules() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, content::MODULES.as_slice())
}

/// `POST /api/v1/chat`
pub async fn chat<B>(req: Request<B>, max_body_size: u64) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_content_length(req.headers(), max_body_size)?;
    let body = read_body(req.into_body(), max_body_size).await?;
    let chat_req = parse_chat_request(&body)?;

    let response = ChatResponse {
        response: content::respond(&chat_req.message),
        sources: Vec::new(),
    };
    Ok(json_response(StatusCode::OK, &response))
}

/// Reject early when the declared Content-Length is over the limit
fn check_content_length(headers: &HeaderMap, max_body_size: u64) -> Result<(), ApiError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Err(ApiError::PayloadTooLarge {
                limit: max_body_size,
            })
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Collect the body, enforcing the limit for chunked or lying clients
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(ApiError::PayloadTooLarge {
                limit: max_body_size,
            })
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(ApiError::BodyRead)
        }
    }
}

/// Decode a chat body; any JSON object is accepted
fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidBody(format!("Invalid JSON: {e}")))?;
    match value {
        Value::Object(object) => Ok(ChatRequest::from_object(&object)),
        _ => Err(ApiError::InvalidBody(
            "Request body must be a JSON object".to_string(),
        )),
    }
}
