//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use reel_api::error::AppError;
use reel_core::error::CoreError;
use reel_core::store::{StoreError, StoreOperation};
use reel_core::validation::{FieldViolation, ValidationErrors, ViolationCode};

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Movie",
        id: "abc".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, serde_json::json!({"message": "Movie not found"}));
}

#[tokio::test]
async fn validation_error_returns_400_with_every_violation() {
    let errors = ValidationErrors::new(vec![
        FieldViolation::new("year", ViolationCode::TooSmall, "Year must be at least 1900")
            .with_value(&serde_json::json!(1899)),
        FieldViolation::new("genre", ViolationCode::TooSmall, "Genre must not be empty"),
    ]);

    let (status, json) = error_to_response(AppError::from(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "year");
    assert_eq!(errors[0]["code"], "too_small");
    assert_eq!(errors[0]["value"], 1899);
    assert!(errors[1].get("value").is_none());
}

#[tokio::test]
async fn bad_request_error_points_at_body() {
    let err = AppError::BadRequest("Expected request with `Content-Type: application/json`".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["field"], "body");
    assert_eq!(json["errors"][0]["code"], "invalid_type");
}

#[tokio::test]
async fn store_error_returns_operation_message_only() {
    for (operation, message) in [
        (StoreOperation::List, "Error retrieving movies"),
        (StoreOperation::Get, "Error retrieving movie"),
        (StoreOperation::Create, "Error creating movie"),
        (StoreOperation::Update, "Error updating movie"),
        (StoreOperation::Delete, "Error deleting movie"),
    ] {
        let (status, json) = error_to_response(StoreError::new(operation).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({"message": message}));
    }
}
