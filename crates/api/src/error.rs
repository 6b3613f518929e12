use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reel_core::error::CoreError;
use reel_core::store::StoreError;
use reel_core::validation::{FieldViolation, ValidationErrors, ViolationCode};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every failure a handler can produce ends up here, so the response bodies
/// are identical whichever storage backend is active:
///
/// | Variant                 | Status | Body                          |
/// |-------------------------|--------|-------------------------------|
/// | `CoreError::NotFound`   | 404    | `{"message": "Movie not found"}` |
/// | `CoreError::Validation` | 400    | `{"errors": [...]}`           |
/// | `BadRequest`            | 400    | `{"errors": [...]}`           |
/// | `Store`                 | 500    | `{"message": <operation message>}` |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reel_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend fault. Already logged with detail by the backend.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A request body that could not be read as JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => {
                tracing::debug!(entity, id = %id, "Entity not found");
                message(StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            AppError::Core(CoreError::Validation(errors)) => {
                errors_response(errors.into_violations())
            }
            AppError::Store(err) => {
                tracing::warn!(operation = %err.operation, "Request failed on storage fault");
                message(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::BadRequest(msg) => errors_response(vec![FieldViolation::new(
                "body",
                ViolationCode::InvalidType,
                msg,
            )]),
        }
    }
}

fn message(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}

fn errors_response(errors: Vec<FieldViolation>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "errors": errors })),
    )
        .into_response()
}
