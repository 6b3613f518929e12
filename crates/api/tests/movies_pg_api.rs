//! HTTP-level tests against the PostgreSQL backend.
//!
//! Each test gets a fresh database with the schema from `crates/db/migrations`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, get, matrix, patch_json, post_json};
use reel_db::PgMovieRepo;
use serde_json::json;
use sqlx::PgPool;

fn pg_app(pool: PgPool) -> Router {
    common::build_test_app(Arc::new(PgMovieRepo::new(pool)))
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_get_delete_lifecycle(pool: PgPool) {
    let app = pg_app(pool);

    let response = post_json(&app, "/movies", matrix()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(created["genre"], json!(["Sci-Fi"]));

    let response = get(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = delete(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"message": "Movie not found"}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_id_is_404(pool: PgPool) {
    let app = pg_app(pool);
    assert_eq!(get(&app, "/movies/not-a-uuid").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(&app, "/movies/not-a-uuid").await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_merges_and_validates(pool: PgPool) {
    let app = pg_app(pool);
    let created = body_json(post_json(&app, "/movies", matrix()).await).await;
    let uri = format!("/movies/{}", created["id"].as_str().unwrap());

    let response = patch_json(&app, &uri, json!({"year": 1899})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json(&app, &uri, json!({"rate": 8.7, "genre": ["Action", "Sci-Fi"]})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut expected = created;
    expected["rate"] = json!(8.7);
    expected["genre"] = json!(["Action", "Sci-Fi"]);
    assert_eq!(body_json(response).await, expected);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn genre_filter_ignores_case(pool: PgPool) {
    let app = pg_app(pool);
    post_json(&app, "/movies", matrix()).await;

    let upper = body_json(get(&app, "/movies?genre=SCI-FI").await).await;
    let lower = body_json(get(&app, "/movies?genre=sci-fi").await).await;
    assert_eq!(upper, lower);
    assert_eq!(upper.as_array().unwrap().len(), 1);

    let none = body_json(get(&app, "/movies?genre=Anime").await).await;
    assert_eq!(none, json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_postgres_backend(pool: PgPool) {
    let app = pg_app(pool);
    let json = body_json(get(&app, "/health").await).await;
    assert_eq!(json["backend"], "postgres");
}
