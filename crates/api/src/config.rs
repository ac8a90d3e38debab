//! # API Configuration Module
//!
//! Loads server, database and booking settings from environment variables,
//! falling back to defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: Host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `DATABASE_URL`: PostgreSQL connection string. When unset it is assembled
//!   from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `DB_ACQUIRE_TIMEOUT_SECONDS`: Wait for a pooled connection (default: 5)
//! - `BOOKING_LOCK_TIMEOUT_MS`: Longest wait for a row lock (default: 5000)
//! - `LESSON_DURATION_MINUTES`: Length of a lesson without explicit end (default: 60)

use std::{env, str::FromStr, time::Duration};

use eyre::{Result, WrapErr};
use tracing::Level;
use tutorbook_core::models::time_slot::DEFAULT_LESSON_MINUTES;
use tutorbook_db::{PoolSettings, StoreSettings};

// A lesson never outlasts the day it starts on.
const MAX_LESSON_MINUTES: i64 = 24 * 60;

/// Configuration for the booking API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use tutorbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub db_max_connections: u32,

    pub db_acquire_timeout: u64,

    /// Row lock wait bound for booking transactions, in milliseconds
    pub lock_timeout_ms: u64,

    pub lesson_duration_minutes: i64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `API_PORT` or `DB_PORT` is not a valid port number,
    /// or when `LESSON_DURATION_MINUTES` is not between one minute and one day.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "8080")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let db_port: u16 = var("DB_PORT", "5432")
                    .parse()
                    .wrap_err("Invalid DB_PORT value")?;
                format!(
                    "postgres://{}:{}@{}:{}/{}?sslmode=disable",
                    var("DB_USER", "postgres"),
                    var("DB_PASSWORD", "postgres"),
                    var("DB_HOST", "localhost"),
                    db_port,
                    var("DB_NAME", "postgres"),
                )
            }
        };

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let lesson_duration_minutes = parse_or(
            &lookup,
            "LESSON_DURATION_MINUTES",
            DEFAULT_LESSON_MINUTES,
        );
        if !(1..=MAX_LESSON_MINUTES).contains(&lesson_duration_minutes) {
            eyre::bail!(
                "LESSON_DURATION_MINUTES must be between 1 and {}, got {}",
                MAX_LESSON_MINUTES,
                lesson_duration_minutes
            );
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout: parse_or(&lookup, "API_REQUEST_TIMEOUT_SECONDS", 30),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10),
            db_acquire_timeout: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS", 5),
            lock_timeout_ms: parse_or(&lookup, "BOOKING_LOCK_TIMEOUT_MS", 5000),
            lesson_duration_minutes,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            lesson_duration: chrono::Duration::minutes(self.lesson_duration_minutes),
        }
    }
}

// Tuning values fall back to their default when unparsable.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
