//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRUSTIFY_DATABASE_URL` - `SQLite` connection string
//!   (e.g. `sqlite://trustify.db`)
//!
//! ## Optional
//! - `RUST_LOG` - tracing filter, read directly by `tracing-subscriber`

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Platform configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (may contain credentials).
    pub database_url: SecretString,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when a required variable is
    /// absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_env("TRUSTIFY_DATABASE_URL")?;

        Ok(Self {
            database_url: SecretString::from(database_url),
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}
