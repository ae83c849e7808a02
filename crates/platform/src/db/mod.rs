//! Database operations for the `SQLite` store.
//!
//! # Tables
//!
//! - `account` - identity store (credentials, role)
//! - `store` - store registry, each row referencing its owning account
//! - `rating` - rating ledger, unique on (`account_id`, `store_id`)
//!
//! Uniqueness (account email, one rating per pair) is enforced by unique
//! indexes; multi-row effects run inside transactions opened by the
//! services. Migrations live in `crates/platform/migrations/` and run via:
//!
//! ```bash
//! cargo run -p trustify-cli -- migrate
//! ```

pub mod accounts;
pub mod ratings;
pub mod stores;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use accounts::{AccountFilter, AccountRepository};
pub use ratings::RatingRepository;
pub use stores::{StoreFilter, StoreRepository};

/// Embedded migrations for the platform schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign-key enforcement is switched on for every connection; the file is
/// created when missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a fully migrated in-memory database.
///
/// The pool is pinned to a single never-expiring connection, because every
/// `SQLite` in-memory connection is its own database.
///
/// # Errors
///
/// Returns [`RepositoryError`] if the connection or migrations fail.
pub async fn create_in_memory_pool() -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}
