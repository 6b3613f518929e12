//! Start-up selection of the movie backend.

use std::sync::Arc;

use anyhow::Context;
use reel_core::store::MovieStore;
use reel_db::{JsonMovieStore, PgMovieRepo};

use crate::config::{ServerConfig, StorageBackend};

/// Open the backend named by `config.backend`.
///
/// For PostgreSQL this connects and runs a health check, so an unreachable
/// database fails start-up before the listener binds.
pub async fn connect_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn MovieStore>> {
    match config.backend {
        StorageBackend::Json => {
            let store = match &config.movies_file {
                Some(path) => JsonMovieStore::from_path(path)
                    .await
                    .with_context(|| format!("Failed to load movies from {}", path.display()))?,
                None => JsonMovieStore::bundled().context("Failed to load bundled movies")?,
            };
            tracing::info!(count = store.len().await, "In-memory movie store seeded");
            Ok(Arc::new(store))
        }
        StorageBackend::Postgres => {
            let options = config
                .database
                .connect_options()
                .context("Invalid database connection settings")?;

            let pool = reel_db::create_pool(options)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            reel_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            Ok(Arc::new(PgMovieRepo::new(pool)))
        }
    }
}
