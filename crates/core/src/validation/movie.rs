//! Movie schema checks.
//!
//! Both entry points collect every violation instead of stopping at the first
//! one, and neither panics. Fields not in the schema (including a
//! client-supplied `id`) are ignored.

use serde_json::{Map, Number, Value};
use validator::ValidateUrl;

use super::rules::{FieldViolation, ValidationErrors, ViolationCode};
use crate::movie::{Genre, MoviePatch, NewMovie};

pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2024;
pub const MIN_RATE: f64 = 0.0;
pub const MAX_RATE: f64 = 10.0;

const POSTER_MESSAGE: &str = "Poster must be a string and a valid URL";
const GENRE_MESSAGE: &str = "Genre must be a non-empty array of valid genres";

/// Check `input` against the complete movie schema (used for creation).
pub fn validate_movie(input: &Value) -> Result<NewMovie, ValidationErrors> {
    let object = as_object(input)?;
    let mut reader = FieldReader::new(object, Presence::Required);
    let patch = reader.read_all();

    if !reader.errors.is_empty() {
        return Err(ValidationErrors::new(reader.errors));
    }

    // Every required field was present and valid, so each is `Some` here.
    match patch {
        MoviePatch {
            title: Some(title),
            year: Some(year),
            director: Some(director),
            duration: Some(duration),
            poster: Some(poster),
            rate,
            genre: Some(genre),
        } => Ok(NewMovie {
            title,
            year,
            director,
            duration,
            poster,
            rate,
            genre,
        }),
        _ => Err(ValidationErrors::new(vec![FieldViolation::new(
            "body",
            ViolationCode::Required,
            "Movie is incomplete",
        )])),
    }
}

/// Check `input` with every field optional (used for partial updates).
///
/// Fields that are present must still satisfy their constraint.
pub fn validate_partial_movie(input: &Value) -> Result<MoviePatch, ValidationErrors> {
    let object = as_object(input)?;
    let mut reader = FieldReader::new(object, Presence::Optional);
    let patch = reader.read_all();

    if reader.errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors::new(reader.errors))
    }
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    input.as_object().ok_or_else(|| {
        ValidationErrors::new(vec![FieldViolation::new(
            "body",
            ViolationCode::InvalidType,
            format!("Expected an object, received {}", type_name(input)),
        )
        .with_value(input)])
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// Reads schema fields out of a JSON object, recording violations as it goes.
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    presence: Presence,
    errors: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>, presence: Presence) -> Self {
        Self {
            object,
            presence,
            errors: Vec::new(),
        }
    }

    fn read_all(&mut self) -> MoviePatch {
        MoviePatch {
            title: self.title(),
            year: self.year(),
            director: self.string("director", "Director must be a string", Presence::Required),
            duration: self.duration(),
            poster: self.poster(),
            rate: self.rate(),
            genre: self.genre(),
        }
    }

    /// Look up `field`, reporting it as missing when this reader (and the
    /// field) require it.
    fn lookup(&mut self, field: &str, presence: Presence) -> Option<&'a Value> {
        let value = self.object.get(field);
        if value.is_none()
            && presence == Presence::Required
            && self.presence == Presence::Required
        {
            self.errors.push(FieldViolation::new(
                field,
                ViolationCode::Required,
                format!("{} is required", capitalize(field)),
            ));
        }
        value
    }

    fn string(&mut self, field: &str, message: &str, presence: Presence) -> Option<String> {
        let value = self.lookup(field, presence)?;
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.errors.push(
                    FieldViolation::new(field, ViolationCode::InvalidType, message)
                        .with_value(other),
                );
                None
            }
        }
    }

    /// The field as an integer, together with the raw value for reporting.
    fn integer(&mut self, field: &str) -> Option<(i64, &'a Value)> {
        let value = self.lookup(field, Presence::Required)?;
        let label = capitalize(field);
        let Value::Number(n) = value else {
            self.errors.push(
                FieldViolation::new(
                    field,
                    ViolationCode::InvalidType,
                    format!("{label} must be a number"),
                )
                .with_value(value),
            );
            return None;
        };
        match as_integer(n) {
            Some(i) => Some((i, value)),
            None => {
                self.errors.push(
                    FieldViolation::new(
                        field,
                        ViolationCode::NotInteger,
                        format!("{label} must be an integer"),
                    )
                    .with_value(value),
                );
                None
            }
        }
    }

    fn title(&mut self) -> Option<String> {
        let title = self.string("title", "Title must be a string", Presence::Required)?;
        if title.trim().is_empty() {
            self.errors.push(FieldViolation::new(
                "title",
                ViolationCode::TooSmall,
                "Title must not be empty",
            ));
            return None;
        }
        Some(title)
    }

    fn year(&mut self) -> Option<i32> {
        let (year, raw) = self.integer("year")?;
        if year < MIN_YEAR {
            self.push_range(
                "year",
                ViolationCode::TooSmall,
                format!("Year must be at least {MIN_YEAR}"),
                raw,
            );
            return None;
        }
        if year > MAX_YEAR {
            self.push_range(
                "year",
                ViolationCode::TooBig,
                format!("Year must be at most {MAX_YEAR}"),
                raw,
            );
            return None;
        }
        i32::try_from(year).ok()
    }

    fn duration(&mut self) -> Option<i32> {
        let (duration, raw) = self.integer("duration")?;
        if duration <= 0 {
            self.push_range(
                "duration",
                ViolationCode::TooSmall,
                "Duration must be a positive number of minutes".to_string(),
                raw,
            );
            return None;
        }
        match i32::try_from(duration) {
            Ok(d) => Some(d),
            Err(_) => {
                self.push_range(
                    "duration",
                    ViolationCode::TooBig,
                    format!("Duration must be at most {}", i32::MAX),
                    raw,
                );
                None
            }
        }
    }

    fn poster(&mut self) -> Option<String> {
        let poster = self.string("poster", POSTER_MESSAGE, Presence::Required)?;
        if !poster.validate_url() {
            self.errors.push(
                FieldViolation::new("poster", ViolationCode::InvalidUrl, POSTER_MESSAGE)
                    .with_value(&Value::String(poster)),
            );
            return None;
        }
        Some(poster)
    }

    fn rate(&mut self) -> Option<f64> {
        let value = self.lookup("rate", Presence::Optional)?;
        let Some(rate) = value.as_f64() else {
            self.errors.push(
                FieldViolation::new("rate", ViolationCode::InvalidType, "Rate must be a number")
                    .with_value(value),
            );
            return None;
        };
        if rate < MIN_RATE {
            self.errors.push(
                FieldViolation::new("rate", ViolationCode::TooSmall, "Rate must be at least 0")
                    .with_value(value),
            );
            return None;
        }
        if rate > MAX_RATE {
            self.errors.push(
                FieldViolation::new("rate", ViolationCode::TooBig, "Rate must be at most 10")
                    .with_value(value),
            );
            return None;
        }
        Some(rate)
    }

    fn genre(&mut self) -> Option<Vec<Genre>> {
        let value = self.lookup("genre", Presence::Required)?;
        let Some(items) = value.as_array() else {
            self.errors.push(
                FieldViolation::new("genre", ViolationCode::InvalidType, GENRE_MESSAGE)
                    .with_value(value),
            );
            return None;
        };
        if items.is_empty() {
            self.errors.push(
                FieldViolation::new("genre", ViolationCode::TooSmall, GENRE_MESSAGE)
                    .with_value(value),
            );
            return None;
        }

        let mut genres = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match item.as_str().map(str::parse::<Genre>) {
                Some(Ok(genre)) => genres.push(genre),
                _ => {
                    valid = false;
                    self.errors.push(
                        FieldViolation::new(
                            format!("genre[{index}]"),
                            ViolationCode::InvalidEnumValue,
                            format!("Invalid genre. Expected one of: {}", genre_names()),
                        )
                        .with_value(item),
                    );
                }
            }
        }
        valid.then_some(genres)
    }

    fn push_range(&mut self, field: &str, code: ViolationCode, message: String, value: &Value) {
        self.errors
            .push(FieldViolation::new(field, code, message).with_value(value));
    }
}

/// Accept integral JSON numbers, including floats with no fractional part
/// (`1999.0`). Integral values beyond `i64` saturate, so the range checks
/// report them as too big or too small.
fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return Some(i64::MAX);
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 {
        // `as` saturates at the i64 bounds.
        Some(f as i64)
    } else {
        None
    }
}

fn genre_names() -> String {
    Genre::ALL
        .iter()
        .map(|g| g.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
