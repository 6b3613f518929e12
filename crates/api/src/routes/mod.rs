pub mod health;
pub mod movies;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// /health                  service health
/// /movies                  list, create
/// /movies/{id}             get, update, delete
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(movies::router())
}
