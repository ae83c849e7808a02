//! Authentication service.
//!
//! Self-service signup, password login and password change. Accounts
//! created here are always plain USERs; privileged roles only come from the
//! coordinator or from seeding.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use tracing::info;

use trustify_core::{AccountId, Role};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::error::Error;
use crate::models::Account;
use crate::validation::{ADDRESS_MAX, NAME_MAX, NAME_MIN, Validator};

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a new USER account.
    ///
    /// Self-registered names carry the stricter 10-character minimum; the
    /// 2-character floor is reserved for admin-created accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` when any field fails its rule.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        address: Option<&str>,
    ) -> Result<Account, AuthError> {
        let mut v = Validator::new();
        v.length("name", name, NAME_MIN, NAME_MAX);
        let email = v.email("email", email);
        v.password("password", password);
        if let Some(address) = address {
            v.max_length("address", address, ADDRESS_MAX);
        }
        let email = v.finish_fields_with(email).map_err(AuthError::Validation)?;

        let password_hash = hash_password(password).map_err(|_| AuthError::PasswordHash)?;

        let account = self
            .accounts
            .create(name, &email, &password_hash, address, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        info!(account_id = %account.id, "account signed up");
        Ok(account)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong. Unknown emails report the same kind as wrong passwords.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = trustify_core::Email::parse(email)?;

        let (account, password_hash) = self
            .accounts
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Change an account's password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if the account doesn't exist.
    /// Returns `AuthError::InvalidCredentials` if the current password is
    /// wrong, and `AuthError::Validation` if the new one fails policy.
    pub async fn update_password(
        &self,
        id: AccountId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut v = Validator::new();
        v.password("new_password", new_password);
        v.finish_fields().map_err(AuthError::Validation)?;

        let current_hash = self.accounts.password_hash(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::AccountNotFound,
            other => AuthError::Repository(other),
        })?;

        verify_password(current_password, &current_hash)?;

        let new_hash = hash_password(new_password).map_err(|_| AuthError::PasswordHash)?;
        self.accounts.update_password_hash(id, &new_hash).await?;

        info!(account_id = %id, "password updated");
        Ok(())
    }
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| Error::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("Secret1!").unwrap();
        assert!(verify_password("Secret1!", &hash).is_ok());
        assert!(verify_password("Wrong1!x", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Secret1!").unwrap();
        let b = hash_password("Secret1!").unwrap();
        assert_ne!(a, b);
    }
}
