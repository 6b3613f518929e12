//! Repository layer.
//!
//! Repositories wrap a `PgPool` and translate between table rows and domain
//! types.

pub mod movie_repo;

pub use movie_repo::PgMovieRepo;
