//! In-memory movie backend seeded from a JSON dataset.
//!
//! The whole catalogue lives in one ordered `Vec` behind a `RwLock`. Writes
//! are visible immediately to later calls and are lost when the process
//! exits.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reel_core::movie::{GenreFilter, Movie, MoviePatch, NewMovie};
use reel_core::store::{MovieStore, StoreResult};
use reel_core::validation::{validate_movie, ValidationErrors};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The dataset shipped with the service.
const BUNDLED_MOVIES: &str = include_str!("../data/movies.json");

/// Why a seed dataset could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed data must be a JSON array of movies")]
    NotAnArray,

    #[error("seed movie at index {index} has a missing or blank id")]
    MissingId { index: usize },

    #[error("seed movie at index {index} is invalid: {errors}")]
    Invalid {
        index: usize,
        errors: ValidationErrors,
    },

    #[error("duplicate movie id in seed data: {0}")]
    DuplicateId(String),
}

/// Process-local movie catalogue.
#[derive(Debug)]
pub struct JsonMovieStore {
    movies: RwLock<Vec<Movie>>,
}

impl JsonMovieStore {
    /// An empty catalogue.
    pub fn new() -> Self {
        Self {
            movies: RwLock::new(Vec::new()),
        }
    }

    /// Load the dataset bundled into the binary.
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_MOVIES)
    }

    /// Load a dataset from a file on disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&raw)
    }

    /// Parse a JSON array of movies.
    ///
    /// Each record must carry a unique `id` and pass full validation, so the
    /// store never holds a movie the API would have rejected.
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Array(items) = value else {
            return Err(SeedError::NotAnArray);
        };

        let mut seen = HashSet::with_capacity(items.len());
        let mut movies = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let id = item
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or(SeedError::MissingId { index })?
                .to_string();

            let movie = validate_movie(item)
                .map_err(|errors| SeedError::Invalid { index, errors })?;

            if !seen.insert(id.clone()) {
                return Err(SeedError::DuplicateId(id));
            }
            movies.push(movie.into_movie(id));
        }

        tracing::debug!(count = movies.len(), "Seed movies loaded");

        Ok(Self {
            movies: RwLock::new(movies),
        })
    }

    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

impl Default for JsonMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieStore for JsonMovieStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn get_all(&self, filter: &GenreFilter) -> StoreResult<Vec<Movie>> {
        let movies = self.movies.read().await;
        let result = match filter.genre() {
            Some(genre) => movies
                .iter()
                .filter(|m| m.has_genre(genre))
                .cloned()
                .collect(),
            None => movies.clone(),
        };
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, movie: NewMovie) -> StoreResult<Movie> {
        let movie = movie.into_movie(Uuid::new_v4().to_string());
        self.movies.write().await.push(movie.clone());
        tracing::debug!(movie_id = %movie.id, "Movie appended to in-memory store");
        Ok(movie)
    }

    async fn update(&self, id: &str, patch: MoviePatch) -> StoreResult<Option<Movie>> {
        let mut movies = self.movies.write().await;
        let Some(movie) = movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        movie.apply(patch);
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut movies = self.movies.write().await;
        match movies.iter().position(|m| m.id == id) {
            Some(index) => {
                movies.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
