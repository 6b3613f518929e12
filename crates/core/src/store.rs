//! Storage capability contract shared by every movie backend.
//!
//! Not-found is part of the success type (`Option` / `bool`), never an error,
//! so callers handle absence the same way whichever backend is injected.
//! [`StoreError`] is reserved for faults in the backend itself.

use std::fmt;

use async_trait::async_trait;

use crate::movie::{GenreFilter, Movie, MoviePatch, NewMovie};

/// The operation a storage fault happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl StoreOperation {
    /// Client-safe failure message for this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            StoreOperation::List => "Error retrieving movies",
            StoreOperation::Get => "Error retrieving movie",
            StoreOperation::Create => "Error creating movie",
            StoreOperation::Update => "Error updating movie",
            StoreOperation::Delete => "Error deleting movie",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOperation::List => "list",
            StoreOperation::Get => "get",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A backend fault, scoped to the failed operation.
///
/// Carries no driver detail; backends log the underlying error
/// before constructing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", .operation.failure_message())]
pub struct StoreError {
    pub operation: StoreOperation,
}

impl StoreError {
    pub fn new(operation: StoreOperation) -> Self {
        Self { operation }
    }
}

/// Convenience alias for backend results.
pub type StoreResult<T> = Result<T, StoreError>;

/// The five operations every movie backend provides.
///
/// Calls are independent: no transaction spans two of them.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Every movie in the backend's stable order, or only those carrying the
    /// filter's genre (case-insensitive). An unknown genre yields an empty list.
    async fn get_all(&self, filter: &GenreFilter) -> StoreResult<Vec<Movie>>;

    /// The movie with `id`, or `None`.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Movie>>;

    /// Persist a validated movie under a freshly generated id.
    async fn create(&self, movie: NewMovie) -> StoreResult<Movie>;

    /// Shallow-merge `patch` onto the stored movie. `None` if `id` is absent.
    async fn update(&self, id: &str, patch: MoviePatch) -> StoreResult<Option<Movie>>;

    /// Remove the movie. `false` if there was nothing to delete.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}
