//! Admin bootstrap command.
//!
//! # Usage
//!
//! ```bash
//! trustify seed admin -p 'Trustify@2025'
//! ```
//!
//! Re-running against a database that already carries the admin email is a
//! no-op; the existing account is left untouched.
//!
//! # Environment Variables
//!
//! - `TRUSTIFY_DATABASE_URL` - `SQLite` connection string

use tracing::info;

use trustify_platform::config::Config;
use trustify_platform::db;
use trustify_platform::seed::{SeedOutcome, bootstrap_admin};

/// Ensure the bootstrap ADMIN account exists.
///
/// # Errors
///
/// Returns an error if configuration is missing, the input fails
/// validation, or the database fails.
pub async fn admin(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;

    match bootstrap_admin(&pool, name, email, password).await? {
        SeedOutcome::Created(account) => {
            info!(account_id = %account.id, email = %account.email, "Admin account created");
        }
        SeedOutcome::AlreadyPresent(account) => {
            info!(
                account_id = %account.id,
                email = %account.email,
                "Account already present; nothing changed"
            );
        }
    }

    Ok(())
}
