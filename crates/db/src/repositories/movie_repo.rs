//! PostgreSQL movie backend over the `movie`, `genre` and `movie_genres`
//! tables.
//!
//! Ids travel as strings at the API boundary and as 16-byte `UUID` values in
//! the database; every query converts at the edge. An inbound id that is not
//! a UUID cannot match any row and is treated as not-found without a query.

use async_trait::async_trait;
use reel_core::movie::{Genre, GenreFilter, Movie, MoviePatch, NewMovie};
use reel_core::store::{MovieStore, StoreError, StoreOperation, StoreResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Column list for movie queries. Genres come back as an ordered text array.
const MOVIE_COLUMNS: &str = "\
    m.id, m.title, m.year, m.director, m.duration, m.poster, m.rate, \
    ARRAY(\
        SELECT g.name FROM movie_genres mg \
        JOIN genre g ON g.id = mg.genre_id \
        WHERE mg.movie_id = m.id \
        ORDER BY mg.position\
    ) AS genre";

/// Links a movie to its genres, preserving list order in `position`.
/// `$1` is the movie id, `$2` the genre names.
const INSERT_GENRE_LINKS: &str = "\
    INSERT INTO movie_genres (movie_id, position, genre_id) \
    SELECT $1, (t.ord - 1)::smallint, g.id \
    FROM UNNEST($2::text[]) WITH ORDINALITY AS t(name, ord) \
    JOIN genre g ON g.name = t.name";

/// A row from `movie` with its aggregated genre names.
#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    year: i32,
    director: String,
    duration: i32,
    poster: String,
    rate: Option<f64>,
    genre: Vec<String>,
}

impl MovieRow {
    fn into_movie(self, operation: StoreOperation) -> StoreResult<Movie> {
        let genre = self
            .genre
            .iter()
            .map(|name| name.parse::<Genre>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                tracing::error!(
                    error = %err,
                    movie_id = %self.id,
                    %operation,
                    "Unknown genre stored for movie"
                );
                StoreError::new(operation)
            })?;

        Ok(Movie {
            id: self.id.to_string(),
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            rate: self.rate,
            genre,
        })
    }
}

/// Log a driver error with full detail and replace it with a generic,
/// operation-scoped [`StoreError`].
fn fault(operation: StoreOperation) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        tracing::error!(error = %err, %operation, "Database error");
        StoreError::new(operation)
    }
}

fn parse_id(id: &str) -> Option<Uuid> {
    match Uuid::parse_str(id) {
        Ok(uuid) => Some(uuid),
        Err(_) => {
            tracing::debug!(movie_id = id, "Movie id is not a UUID");
            None
        }
    }
}

fn genre_names(genres: &[Genre]) -> Vec<String> {
    genres.iter().map(|g| g.as_str().to_string()).collect()
}

/// Provides movie data access against PostgreSQL.
#[derive(Clone)]
pub struct PgMovieRepo {
    pool: PgPool,
}

impl PgMovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a genre name to its id, ignoring case.
    async fn find_genre_id(&self, name: &str) -> Result<Option<i16>, sqlx::Error> {
        sqlx::query_scalar::<_, i16>("SELECT id FROM genre WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn fetch(&self, id: Uuid, operation: StoreOperation) -> StoreResult<Option<Movie>> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.id = $1");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(fault(operation))?;

        row.map(|r| r.into_movie(operation)).transpose()
    }
}

#[async_trait]
impl MovieStore for PgMovieRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get_all(&self, filter: &GenreFilter) -> StoreResult<Vec<Movie>> {
        let op = StoreOperation::List;

        let rows = match filter.genre() {
            None => {
                let query =
                    format!("SELECT {MOVIE_COLUMNS} FROM movie m ORDER BY m.seq");
                sqlx::query_as::<_, MovieRow>(&query)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(fault(op))?
            }
            Some(name) => {
                let Some(genre_id) = self.find_genre_id(name).await.map_err(fault(op))? else {
                    return Ok(Vec::new());
                };
                let query = format!(
                    "SELECT {MOVIE_COLUMNS} FROM movie m \
                     JOIN (SELECT DISTINCT movie_id FROM movie_genres WHERE genre_id = $1) matched \
                         ON matched.movie_id = m.id \
                     ORDER BY m.seq"
                );
                sqlx::query_as::<_, MovieRow>(&query)
                    .bind(genre_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(fault(op))?
            }
        };

        rows.into_iter().map(|r| r.into_movie(op)).collect()
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Movie>> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };
        self.fetch(uuid, StoreOperation::Get).await
    }

    /// The database generates the id; the stored row is read back so the
    /// caller sees exactly what was persisted.
    async fn create(&self, movie: NewMovie) -> StoreResult<Movie> {
        let op = StoreOperation::Create;
        let query = "WITH inserted AS ( \
                 INSERT INTO movie (title, year, director, duration, poster, rate) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id \
             ), linked AS ( \
                 INSERT INTO movie_genres (movie_id, position, genre_id) \
                 SELECT inserted.id, (t.ord - 1)::smallint, g.id \
                 FROM inserted \
                 CROSS JOIN UNNEST($7::text[]) WITH ORDINALITY AS t(name, ord) \
                 JOIN genre g ON g.name = t.name \
             ) \
             SELECT id FROM inserted";
        let id = sqlx::query_scalar::<_, Uuid>(query)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(&movie.director)
            .bind(movie.duration)
            .bind(&movie.poster)
            .bind(movie.rate)
            .bind(genre_names(&movie.genre))
            .fetch_one(&self.pool)
            .await
            .map_err(fault(op))?;

        self.fetch(id, op).await?.ok_or_else(|| {
            tracing::error!(movie_id = %id, "Created movie vanished before re-read");
            StoreError::new(op)
        })
    }

    /// Read, merge in the application, then write every column. The read and
    /// the write are separate statements, so concurrent updates to the same
    /// movie can overwrite each other.
    async fn update(&self, id: &str, patch: MoviePatch) -> StoreResult<Option<Movie>> {
        let op = StoreOperation::Update;
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };
        let Some(mut movie) = self.fetch(uuid, op).await? else {
            return Ok(None);
        };

        let genres_changed = patch.genre.is_some();
        movie.apply(patch);

        let mut tx = self.pool.begin().await.map_err(fault(op))?;

        let result = sqlx::query(
            "UPDATE movie SET \
                 title = $2, year = $3, director = $4, duration = $5, poster = $6, rate = $7 \
             WHERE id = $1",
        )
        .bind(uuid)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.director)
        .bind(movie.duration)
        .bind(&movie.poster)
        .bind(movie.rate)
        .execute(&mut *tx)
        .await
        .map_err(fault(op))?;

        if result.rows_affected() == 0 {
            // Deleted between the read and the write.
            return Ok(None);
        }

        if genres_changed {
            sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
                .bind(uuid)
                .execute(&mut *tx)
                .await
                .map_err(fault(op))?;
            sqlx::query(INSERT_GENRE_LINKS)
                .bind(uuid)
                .bind(genre_names(&movie.genre))
                .execute(&mut *tx)
                .await
                .map_err(fault(op))?;
        }

        tx.commit().await.map_err(fault(op))?;

        self.fetch(uuid, op).await
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let Some(uuid) = parse_id(id) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM movie WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(fault(StoreOperation::Delete))?;
        Ok(result.rows_affected() > 0)
    }
}
