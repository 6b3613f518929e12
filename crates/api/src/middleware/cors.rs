//! Cross-origin request filter.
//!
//! Allowed origins are echoed back with a fixed method and header list.
//! Disallowed origins get no CORS headers, but the request still reaches its
//! handler; the browser is what blocks the response. Every `OPTIONS` request
//! is answered with a bare `200 OK` before routing.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::CorsConfig;

/// Methods advertised to allowed origins.
pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, OPTIONS, DELETE";

/// Request headers advertised to allowed origins.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Which origins may read responses.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Arc<[String]>,
    origin_suffix: Option<Arc<str>>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>, origin_suffix: Option<String>) -> Self {
        Self {
            allowed_origins: allowed_origins.into(),
            origin_suffix: origin_suffix.map(Into::into),
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.allowed_origins.clone(), config.origin_suffix.clone())
    }

    /// Exact allow-list match, or any origin under the shared suffix domain.
    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
            || self
                .origin_suffix
                .as_deref()
                .is_some_and(|suffix| origin.ends_with(suffix))
    }
}

/// Axum middleware applying [`CorsPolicy`]; mount with
/// `axum::middleware::from_fn_with_state`.
pub async fn cors(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let allowed_origin = request
        .headers()
        .get(ORIGIN)
        .filter(|origin| origin.to_str().is_ok_and(|o| policy.allows(o)))
        .cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    if let Some(origin) = allowed_origin {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(
            vec!["http://localhost:8080".to_string()],
            Some(".vercel.app".to_string()),
        )
    }

    #[test]
    fn exact_origin_is_allowed() {
        assert!(policy().allows("http://localhost:8080"));
        assert!(!policy().allows("http://localhost:8081"));
    }

    #[test]
    fn suffix_domain_is_allowed() {
        assert!(policy().allows("https://preview-123.vercel.app"));
        assert!(!policy().allows("https://vercel.app.evil.test"));
    }

    #[test]
    fn no_suffix_means_exact_only() {
        let policy = CorsPolicy::new(vec![], None);
        assert!(!policy.allows("https://preview.vercel.app"));
    }
}
