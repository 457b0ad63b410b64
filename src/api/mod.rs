// API module entry
// Routes the textbook API: liveness, module listing and chat

mod error;
mod handlers;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::ORIGIN;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http::redirect_response;

pub use error::ApiError;

pub const HEALTH_PATH: &str = "/api/health";
pub const MODULES_PATH: &str = "/api/v1/modules";
pub const CHAT_PATH: &str = "/api/v1/chat";

/// API route handler
///
/// Answers CORS preflights, dispatches by method and exact path, redirects
/// a known path written with trailing slashes, and renders rejections as
/// JSON. Never fails at the service level.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if state.cors.is_preflight(&req) {
        return Ok(state.cors.preflight_response(req.headers()));
    }

    let origin = req.headers().get(ORIGIN).cloned();
    let mut resp = route(req, &state)
        .await
        .unwrap_or_else(ApiError::into_response);
    state.cors.apply(origin.as_ref(), &mut resp);
    Ok(resp)
}

async fn route<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    match (method, path.as_str()) {
        (Method::GET, HEALTH_PATH) => Ok(handlers::health()),
        (Method::GET, MODULES_PATH) => Ok(handlers::list_modules()),
        (Method::POST, CHAT_PATH) => handlers::chat(req, state.config.http.max_body_size).await,
        (_, HEALTH_PATH | MODULES_PATH) => Err(ApiError::MethodNotAllowed { allow: "GET" }),
        (_, CHAT_PATH) => Err(ApiError::MethodNotAllowed { allow: "POST" }),
        _ => slash_redirect(&req).ok_or(ApiError::NotFound),
    }
}

/// `/api/health/` answers 307 to `/api/health`, keeping the query
fn slash_redirect<B>(req: &Request<B>) -> Option<Response<Full<Bytes>>> {
    let path = req.uri().path();
    let trimmed = path.trim_end_matches('/');
    let known = [HEALTH_PATH, MODULES_PATH, CHAT_PATH].contains(&trimmed);
    if trimmed.len() == path.len() || !known {
        return None;
    }

    let location = match req.uri().query() {
        Some(query) => format!("{trimmed}?{query}"),
        None => trimmed.to_string(),
    };
    Some(redirect_response(&location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::tutor::{CHAT_RULES, DEFAULT_RESPONSE};
    use http_body_util::BodyExt;
    use hyper::header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_METHOD, ALLOW, CONTENT_TYPE, LOCATION,
    };
    use hyper::StatusCode;
    use serde_json::{json, Value};

    const ROS_ANSWER: &str = "ROS 2 (Robot Operating System 2) is a flexible framework for writing robot software. It provides tools, libraries, and conventions to simplify creating complex robot behavior.";

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("definitely-not-a-config-file").unwrap();
        cfg.http.max_body_size = 64;
        cfg.cors.enabled = true;
        cfg.cors.allowed_origin = "http://localhost:3000".to_string();
        Arc::new(AppState::new(&cfg).unwrap())
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn send(req: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
        handle_request(req, test_state()).await.unwrap()
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    async fn chat(body: &'static str) -> Value {
        let resp = send(request(Method::POST, CHAT_PATH, body)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    #[tokio::test]
    async fn test_health_exact_body() {
        let resp = send(request(Method::GET, HEALTH_PATH, "")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(&body_bytes(resp).await[..], br#"{"status":"healthy"}"#);
    }

    #[tokio::test]
    async fn test_modules_stable() {
        let first = body_json(send(request(Method::GET, MODULES_PATH, "")).await).await;
        let second = body_json(send(request(Method::GET, MODULES_PATH, "")).await).await;
        assert_eq!(first, second);

        let modules = first.as_array().unwrap();
        assert_eq!(modules.len(), 5);
        assert_eq!(modules[0]["slug"], "01-physical-ai-intro");
        assert_eq!(modules[4]["slug"], "05-vla");
        assert_eq!(modules[3]["icon"], "🎯");

        let total: u64 = modules
            .iter()
            .map(|m| m["chapter_count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 7);

        for module in modules {
            let keys: Vec<_> = module.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys.len(), 5);
            for key in ["slug", "title", "icon", "description", "chapter_count"] {
                assert!(module.get(key).is_some(), "missing {key}");
            }
        }
    }

    #[tokio::test]
    async fn test_chat_ros_scenario() {
        let value = chat(r#"{"message": "Tell me about ROS"}"#).await;
        assert_eq!(value, json!({"response": ROS_ANSWER, "sources": []}));
    }

    #[tokio::test]
    async fn test_chat_default_scenario() {
        let value = chat(r#"{"message": "hello"}"#).await;
        assert_eq!(value, json!({"response": DEFAULT_RESPONSE, "sources": []}));
    }

    #[tokio::test]
    async fn test_chat_first_declared_wins() {
        let value = chat(r#"{"message": "does ros support a lidar sensor?"}"#).await;
        assert_eq!(value["response"], ROS_ANSWER);

        let sensor = CHAT_RULES.iter().find(|r| r.trigger == "sensor").unwrap();
        let value = chat(r#"{"message": "Sensor basics"}"#).await;
        assert_eq!(value["response"], sensor.response);
    }

    #[tokio::test]
    async fn test_chat_degenerate_message() {
        for body in [r"{}", r#"{"message": 7}"#, r#"{"message": ["ros"]}"#, r#"{"text": "ros"}"#] {
            let value = chat(body).await;
            assert_eq!(value["response"], DEFAULT_RESPONSE, "body: {body}");
            assert_eq!(value["sources"], json!([]));
        }
    }

    #[tokio::test]
    async fn test_chat_invalid_json() {
        let resp = send(request(Method::POST, CHAT_PATH, "{not json")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let value = body_json(resp).await;
        assert!(value["detail"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_chat_payload_too_large() {
        let body = r#"{"message": "this message is far too long for the tiny limit set in tests"}"#;
        let resp = send(request(Method::POST, CHAT_PATH, body)).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(resp).await,
            json!({"detail": "Request body exceeds 64 bytes"})
        );
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let resp = send(request(Method::GET, "/api/v2/modules", "")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({"detail": "Not Found"}));

        let resp = send(request(Method::GET, "/api/v2/modules/", "")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects() {
        let resp = send(request(Method::GET, "/api/health/", "")).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[LOCATION], HEALTH_PATH);
        assert!(body_bytes(resp).await.is_empty());

        let resp = send(request(Method::POST, "/api/v1/chat//?lang=en", "{}")).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[LOCATION], "/api/v1/chat?lang=en");

        // Redirects still carry the CORS grant
        let mut req = request(Method::GET, "/api/v1/modules/", "");
        req.headers_mut()
            .insert(ORIGIN, "http://localhost:3000".parse().unwrap());
        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let resp = send(request(Method::GET, CHAT_PATH, "")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "POST");
        assert_eq!(body_json(resp).await, json!({"detail": "Method Not Allowed"}));

        let resp = send(request(Method::POST, MODULES_PATH, "{}")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_cors_allowed_origin() {
        let mut req = request(Method::GET, HEALTH_PATH, "");
        req.headers_mut()
            .insert(ORIGIN, "http://localhost:3000".parse().unwrap());
        let resp = send(req).await;
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let mut req = request(Method::GET, HEALTH_PATH, "");
        req.headers_mut()
            .insert(ORIGIN, "http://elsewhere.example".parse().unwrap());
        let resp = send(req).await;
        assert!(!resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_cors_preflight_before_routing() {
        let mut req = request(Method::OPTIONS, CHAT_PATH, "");
        let headers = req.headers_mut();
        headers.insert(ORIGIN, "http://localhost:3000".parse().unwrap());
        headers.insert(ACCESS_CONTROL_REQUEST_METHOD, "POST".parse().unwrap());
        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );

        // Plain OPTIONS is routed like any other method
        let resp = send(request(Method::OPTIONS, CHAT_PATH, "")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
