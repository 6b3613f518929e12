/// Movie identifiers are opaque UUID-formatted strings at the API boundary.
pub type MovieId = String;

/// Name used for the movie entity in not-found errors and log fields.
pub const MOVIE_ENTITY: &str = "Movie";
