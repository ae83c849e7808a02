//! Admin bootstrap.
//!
//! ADMIN accounts never come out of signup or the coordinator; the only way
//! one exists is this idempotent seed step. Re-running it against a
//! database that already carries the admin email is a no-op.

use sqlx::SqlitePool;
use tracing::info;

use trustify_core::{Email, Role};

use crate::db::AccountRepository;
use crate::error::Error;
use crate::models::Account;
use crate::services::auth;
use crate::validation::{ADMIN_NAME_MIN, NAME_MAX, Validator};

/// Default bootstrap admin identity.
pub const DEFAULT_ADMIN_NAME: &str = "Trustify Admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@trustify.com";

/// What the seed step did.
#[derive(Debug)]
pub enum SeedOutcome {
    /// The admin account was created.
    Created(Account),
    /// An account with this email already existed; nothing was changed.
    AlreadyPresent(Account),
}

/// Ensure an ADMIN account exists for `email`, creating it if necessary.
///
/// An existing account under this email is left completely untouched,
/// whatever its role or password.
///
/// # Errors
///
/// Returns [`Error::Validation`] for malformed input and
/// [`Error::Repository`] if the database fails.
pub async fn bootstrap_admin(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<SeedOutcome, Error> {
    let mut v = Validator::new();
    v.length("name", name, ADMIN_NAME_MIN, NAME_MAX);
    let email = v.email("email", email);
    v.password("password", password);
    let email: Email = v.finish_with(email)?;

    let repo = AccountRepository::new(pool);

    if let Some(existing) = repo.get_by_email(&email).await? {
        info!(account_id = %existing.id, role = existing.role.as_str(), "admin seed: account already present");
        return Ok(SeedOutcome::AlreadyPresent(existing));
    }

    let password_hash = auth::hash_password(password)?;
    let account = repo
        .create(name, &email, &password_hash, None, Role::Admin)
        .await?;

    info!(account_id = %account.id, "admin seed: account created");
    Ok(SeedOutcome::Created(account))
}
