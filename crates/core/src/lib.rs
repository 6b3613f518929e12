//! Domain types and contracts for the movie catalogue.
//!
//! Everything here is storage-agnostic: the movie model, the payload
//! validation contract, and the [`store::MovieStore`] trait both backends
//! implement.

pub mod error;
pub mod movie;
pub mod store;
pub mod types;
pub mod validation;
