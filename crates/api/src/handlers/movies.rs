//! Handlers for the movie catalogue.
//!
//! Handlers only see the store through [`MovieStore`](reel_core::store::MovieStore);
//! backend-specific not-found signalling is already folded into `Option`/`bool`
//! and is turned into a uniform 404 here.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reel_core::error::CoreError;
use reel_core::movie::GenreFilter;
use reel_core::types::{MovieId, MOVIE_ENTITY};
use reel_core::validation::{validate_movie, validate_partial_movie};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: MovieId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: MOVIE_ENTITY,
        id,
    })
}

/// Unwrap a JSON body, turning extractor rejections into a 400.
fn read_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable request body");
            Err(AppError::BadRequest(rejection.body_text()))
        }
    }
}

/// GET /movies
///
/// List every movie, or only those carrying `?genre=` (case-insensitive).
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filter): Query<GenreFilter>,
) -> AppResult<impl IntoResponse> {
    let movies = state.store.get_all(&filter).await?;
    Ok(Json(movies))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<impl IntoResponse> {
    let movie = state
        .store
        .get_by_id(&id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(movie))
}

/// POST /movies
///
/// Validate a full movie payload and store it under a fresh id.
pub async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = validate_movie(&read_body(body)?)?;
    let movie = state.store.create(input).await?;

    tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");

    Ok((StatusCode::CREATED, Json(movie)))
}

/// PATCH /movies/{id}
///
/// The payload is validated before the lookup, so a bad payload is a 400
/// even for an unknown id.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let patch = validate_partial_movie(&read_body(body)?)?;
    let movie = state
        .store
        .update(&id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(movie_id = %movie.id, "Movie updated");

    Ok(Json(movie))
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<impl IntoResponse> {
    if !state.store.delete(&id).await? {
        return Err(not_found(id));
    }

    tracing::info!(movie_id = %id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}
