//! Request middleware.
//!
//! - [`cors::cors`] -- Origin allow-list filter with preflight short-circuit.

pub mod cors;
