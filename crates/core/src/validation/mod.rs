//! Movie payload validation.
//!
//! Pure logic over `serde_json::Value`: the full check used for creation, the
//! partial check used for updates, and the violation types both report.

pub mod movie;
pub mod rules;

pub use movie::{validate_movie, validate_partial_movie};
pub use rules::{FieldViolation, ValidationErrors, ViolationCode};
