//! Movie storage backends.
//!
//! - [`JsonMovieStore`] keeps the catalogue in process memory, seeded from a
//!   JSON dataset.
//! - [`PgMovieRepo`] persists it in PostgreSQL through sqlx.
//!
//! Both implement [`reel_core::store::MovieStore`].

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod json_store;
pub mod repositories;

pub use json_store::JsonMovieStore;
pub use repositories::PgMovieRepo;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool and establish the first connection eagerly, so an
/// unreachable database is reported at start-up.
pub async fn create_pool(options: PgConnectOptions) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
