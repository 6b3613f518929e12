use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

/// Origins allowed by default: local dev servers plus the deployed frontend.
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:60458,http://localhost:3000,\
                                    http://localhost:8080,https://api-rest-movies-self.vercel.app";

/// A malformed environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("MOVIES_BACKEND must be 'json' or 'postgres', got '{0}'")]
    UnknownBackend(String),
}

/// Which movie backend the server is started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory catalogue seeded from a JSON dataset.
    Json,
    /// PostgreSQL via sqlx.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "memory" => Ok(StorageBackend::Json),
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Json => f.write_str("json"),
            StorageBackend::Postgres => f.write_str("postgres"),
        }
    }
}

/// Database connection parameters.
///
/// `DATABASE_URL`, when set, takes precedence over the discrete `DB_*` values.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("port", &self.port)
            .finish()
    }
}

/// Cross-origin allow-list.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins, parsed from comma-separated `CORS_ORIGINS`.
    pub allowed_origins: Vec<String>,
    /// Any origin ending with this suffix is also allowed (`CORS_ORIGIN_SUFFIX`).
    pub origin_suffix: Option<String>,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Storage backend (default: `json`).
    pub backend: StorageBackend,
    /// Seed file for the JSON backend; `None` uses the bundled dataset.
    pub movies_file: Option<PathBuf>,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `MOVIES_BACKEND`       | `json`                  |
    /// | `MOVIES_FILE`          | bundled dataset         |
    /// | `DATABASE_URL`         | unset                   |
    /// | `DB_HOST`              | `localhost`             |
    /// | `DB_USER`              | `postgres`              |
    /// | `DB_PASSWORD`          | empty                   |
    /// | `DB_NAME`              | `moviesdb`              |
    /// | `DB_PORT`              | `5432`                  |
    /// | `CORS_ORIGINS`         | local dev + deployed UI |
    /// | `CORS_ORIGIN_SUFFIX`   | `.vercel.app`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = parse("HOST", var("HOST", "0.0.0.0"), "IP address")?;
        let port: u16 = parse("PORT", var("PORT", "3000"), "port number")?;
        let backend: StorageBackend = var("MOVIES_BACKEND", "json").parse()?;
        let movies_file = non_empty(lookup("MOVIES_FILE")).map(PathBuf::from);

        let database = DatabaseConfig {
            url: non_empty(lookup("DATABASE_URL")),
            host: var("DB_HOST", "localhost"),
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", ""),
            name: var("DB_NAME", "moviesdb"),
            port: parse("DB_PORT", var("DB_PORT", "5432"), "port number")?,
        };

        let cors = CorsConfig {
            allowed_origins: var("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            origin_suffix: non_empty(Some(var("CORS_ORIGIN_SUFFIX", ".vercel.app"))),
        };

        let request_timeout_secs: u64 = parse(
            "REQUEST_TIMEOUT_SECS",
            var("REQUEST_TIMEOUT_SECS", "30"),
            "number of seconds",
        )?;

        Ok(Self {
            host,
            port,
            backend,
            movies_file,
            database,
            cors,
            request_timeout_secs,
        })
    }
}

fn parse<T: FromStr>(
    var: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
