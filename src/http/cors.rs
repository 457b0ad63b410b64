//! Cross-origin resource sharing
//!
//! A single trusted origin is allowed, with credentials, every method and
//! every requested header. Requests from other origins get no grant.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use hyper::{Method, Request, Response, StatusCode};

use super::response::text_response;
use crate::config::CorsConfig;
use crate::error::{Error, Result};

const ALL_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const SAFELISTED_HEADERS: &str = "Accept, Accept-Language, Content-Language, Content-Type";

pub struct CorsPolicy {
    /// `None` when CORS is disabled
    allowed_origin: Option<HeaderValue>,
    allow_credentials: bool,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn from_config(cfg: &CorsConfig) -> Result<Self> {
        let allowed_origin = if cfg.enabled {
            let origin = HeaderValue::from_str(&cfg.allowed_origin).map_err(|_| {
                Error::InvalidHeaderValue {
                    field: "cors.allowed_origin",
                    value: cfg.allowed_origin.clone(),
                }
            })?;
            Some(origin)
        } else {
            None
        };

        Ok(Self {
            allowed_origin,
            allow_credentials: cfg.allow_credentials,
            max_age: HeaderValue::from(cfg.max_age),
        })
    }

    pub const fn is_enabled(&self) -> bool {
        self.allowed_origin.is_some()
    }

    fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origin.as_ref() == Some(origin)
    }

    /// An `OPTIONS` request carrying `Origin` and `Access-Control-Request-Method`
    pub fn is_preflight<B>(&self, req: &Request<B>) -> bool {
        self.is_enabled()
            && req.method() == Method::OPTIONS
            && req.headers().contains_key(ORIGIN)
            && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
    }

    /// Answer a preflight request without routing it
    pub fn preflight_response(&self, headers: &HeaderMap) -> Response<Full<Bytes>> {
        let Some(origin) = headers.get(ORIGIN).filter(|o| self.is_allowed(o)) else {
            return text_response(StatusCode::BAD_REQUEST, "Disallowed CORS origin");
        };

        let mut resp = text_response(StatusCode::OK, "OK");
        let out = resp.headers_mut();
        out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        if self.allow_credentials {
            out.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
        out.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALL_METHODS));
        let allow_headers = headers
            .get(ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(SAFELISTED_HEADERS));
        out.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        out.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        out.append(VARY, HeaderValue::from_static("Origin"));
        resp
    }

    /// Grant the request's origin on an already-built response
    pub fn apply(&self, origin: Option<&HeaderValue>, resp: &mut Response<Full<Bytes>>) {
        let Some(origin) = origin else { return };
        if !self.is_enabled() {
            return;
        }

        let out = resp.headers_mut();
        out.append(VARY, HeaderValue::from_static("Origin"));
        if self.is_allowed(origin) {
            out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            if self.allow_credentials {
                out.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
            }
        }
    }
}
