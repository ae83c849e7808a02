//! Integration tests for Trustify.
//!
//! Every test runs against its own fully migrated in-memory `SQLite`
//! database, so the suite is hermetic and needs no external services.
//!
//! ```bash
//! cargo test -p trustify-integration-tests
//! ```

use sqlx::SqlitePool;

use trustify_platform::db;
use trustify_platform::models::Account;
use trustify_platform::services::{
    AuthService, Coordinator, CreateStoreOutcome, CreateStoreRequest, NewStore,
};

/// Password that satisfies the platform policy, reused across fixtures.
pub const TEST_PASSWORD: &str = "Secret@123";

/// A fresh, fully migrated in-memory database.
///
/// # Panics
///
/// Panics when the database cannot be created; tests cannot proceed then.
pub async fn test_pool() -> SqlitePool {
    db::create_in_memory_pool()
        .await
        .expect("failed to create in-memory database")
}

/// Sign up a plain USER with [`TEST_PASSWORD`].
///
/// # Panics
///
/// Panics when signup fails.
pub async fn signup_user(pool: &SqlitePool, name: &str, email: &str) -> Account {
    AuthService::new(pool)
        .signup(name, email, TEST_PASSWORD, None)
        .await
        .expect("signup failed")
}

/// A store payload with valid fields derived from `name`.
#[must_use]
pub fn store_fixture(name: &str) -> NewStore {
    NewStore {
        name: name.to_owned(),
        email: format!("{}@stores.example.com", name.replace(' ', ".").to_lowercase()),
        address: "1 Market Street".to_owned(),
    }
}

/// Create a store whose owner is resolved (or created) by email.
///
/// # Panics
///
/// Panics when the creation fails.
pub async fn create_store_with_owner(
    pool: &SqlitePool,
    store_name: &str,
    owner_email: &str,
) -> CreateStoreOutcome {
    Coordinator::new(pool)
        .create_store(CreateStoreRequest {
            store: store_fixture(store_name),
            owner_email: owner_email.to_owned(),
            owner_name: Some("Fixture Store Owner".to_owned()),
            owner_password: Some(TEST_PASSWORD.to_owned()),
        })
        .await
        .expect("store creation failed")
}
