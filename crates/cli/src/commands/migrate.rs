//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! trustify migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TRUSTIFY_DATABASE_URL` - `SQLite` connection string

use thiserror::Error;
use tracing::info;

use trustify_platform::config::{Config, ConfigError};
use trustify_platform::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns [`MigrationError`] if configuration is missing or the database
/// rejects the migration run.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
