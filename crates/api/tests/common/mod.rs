#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reel_core::store::MovieStore;
use tower::ServiceExt;

use reel_api::config::{CorsConfig, DatabaseConfig, ServerConfig, StorageBackend};
use reel_api::router::build_app_router;
use reel_api::state::AppState;

/// Origin on the explicit allow-list of [`test_config`].
pub const ALLOWED_ORIGIN: &str = "http://localhost:8080";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        backend: StorageBackend::Json,
        movies_file: None,
        database: DatabaseConfig {
            url: None,
            host: "localhost".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            name: "moviesdb".to_string(),
            port: 5432,
        },
        cors: CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
            origin_suffix: Some(".vercel.app".to_string()),
        },
        request_timeout_secs: 30,
    }
}

/// Build the full application router around `store`, with the same
/// middleware stack production uses.
pub fn build_test_app(store: Arc<dyn MovieStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Router over the bundled in-memory dataset.
pub fn json_app() -> Router {
    let store = reel_db::JsonMovieStore::bundled().unwrap();
    build_test_app(Arc::new(store))
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

async fn json_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// POST a raw body, for payloads that are not valid JSON.
pub async fn post_raw(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send an arbitrary request carrying an `Origin` header.
pub async fn with_origin(app: &Router, method: Method, uri: &str, origin: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("origin", origin)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// A valid full movie payload.
pub fn matrix() -> serde_json::Value {
    serde_json::json!({
        "title": "Matrix",
        "year": 1999,
        "director": "Wachowski",
        "duration": 136,
        "poster": "https://x.com/p.jpg",
        "genre": ["Sci-Fi"]
    })
}
