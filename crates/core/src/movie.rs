//! Movie entity, genre catalogue, and the write payloads that produce movies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::MovieId;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// The closed set of genres a movie may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Crime,
    Comedy,
    Drama,
    Horror,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    /// Every genre, in catalogue order.
    pub const ALL: [Genre; 7] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Crime,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::SciFi,
    ];

    /// Canonical display name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Crime => "Crime",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Case-insensitive comparison against a user-supplied genre name.
    pub fn matches(self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the canonical genre names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre: {0}")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Parses the canonical (case-sensitive) name. Filtering uses
    /// [`Genre::matches`] instead, which ignores case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

/// A stored movie record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    pub genre: Vec<Genre>,
}

impl Movie {
    /// Whether any of this movie's genres matches `name`, ignoring case.
    pub fn has_genre(&self, name: &str) -> bool {
        self.genre.iter().any(|g| g.matches(name))
    }

    /// Shallow merge: every field present in `patch` replaces the current
    /// value, every absent field is kept. The id never changes.
    pub fn apply(&mut self, patch: MoviePatch) {
        let MoviePatch {
            title,
            year,
            director,
            duration,
            poster,
            rate,
            genre,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(year) = year {
            self.year = year;
        }
        if let Some(director) = director {
            self.director = director;
        }
        if let Some(duration) = duration {
            self.duration = duration;
        }
        if let Some(poster) = poster {
            self.poster = poster;
        }
        if rate.is_some() {
            self.rate = rate;
        }
        if let Some(genre) = genre {
            self.genre = genre;
        }
    }
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// A fully validated movie without an identifier, ready to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    pub genre: Vec<Genre>,
}

impl NewMovie {
    /// Attach a freshly generated identifier.
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            rate: self.rate,
            genre: self.genre,
        }
    }
}

/// A validated partial update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<Genre>>,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Listing filter (`?genre=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreFilter {
    pub genre: Option<String>,
}

impl GenreFilter {
    pub fn by_genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
        }
    }

    /// The requested genre, treating a blank value as no filter.
    pub fn genre(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Movie {
        Movie {
            id: "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf".to_string(),
            title: "The Matrix".to_string(),
            year: 1999,
            director: "Lana Wachowski".to_string(),
            duration: 136,
            poster: "https://example.com/matrix.jpg".to_string(),
            rate: Some(8.7),
            genre: vec![Genre::Action, Genre::SciFi],
        }
    }

    #[test]
    fn genre_serializes_with_canonical_names() {
        let json = serde_json::to_string(&vec![Genre::SciFi, Genre::Drama]).unwrap();
        assert_eq!(json, r#"["Sci-Fi","Drama"]"#);
    }

    #[test]
    fn genre_from_str_is_case_sensitive() {
        assert_eq!("Sci-Fi".parse::<Genre>(), Ok(Genre::SciFi));
        assert!("sci-fi".parse::<Genre>().is_err());
        assert!("Anime".parse::<Genre>().is_err());
    }

    #[test]
    fn genre_matches_ignores_case() {
        assert!(Genre::SciFi.matches("SCI-FI"));
        assert!(Genre::Action.matches("action"));
        assert!(!Genre::Action.matches("adventure"));
    }

    #[test]
    fn has_genre_checks_every_entry() {
        let movie = matrix();
        assert!(movie.has_genre("sci-fi"));
        assert!(movie.has_genre("ACTION"));
        assert!(!movie.has_genre("Drama"));
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let mut movie = matrix();
        let before = movie.clone();

        movie.apply(MoviePatch {
            title: Some("X".to_string()),
            ..Default::default()
        });

        assert_eq!(movie.title, "X");
        assert_eq!(movie.id, before.id);
        assert_eq!(movie.year, before.year);
        assert_eq!(movie.director, before.director);
        assert_eq!(movie.duration, before.duration);
        assert_eq!(movie.poster, before.poster);
        assert_eq!(movie.rate, before.rate);
        assert_eq!(movie.genre, before.genre);
    }

    #[test]
    fn apply_keeps_rate_when_absent() {
        let mut movie = matrix();
        movie.apply(MoviePatch {
            year: Some(2000),
            ..Default::default()
        });
        assert_eq!(movie.rate, Some(8.7));
        assert_eq!(movie.year, 2000);
    }

    #[test]
    fn unrated_movie_omits_rate_in_json() {
        let mut movie = matrix();
        movie.rate = None;
        let json = serde_json::to_value(&movie).unwrap();
        assert!(json.get("rate").is_none());
    }

    #[test]
    fn blank_genre_filter_is_no_filter() {
        assert_eq!(GenreFilter::by_genre("  ").genre(), None);
        assert_eq!(GenreFilter::default().genre(), None);
        assert_eq!(GenreFilter::by_genre("Drama").genre(), Some("Drama"));
    }
}
