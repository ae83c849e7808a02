//! Admin bootstrap tests.

use trustify_core::Role;
use trustify_platform::seed::{SeedOutcome, bootstrap_admin};

use trustify_integration_tests::{signup_user, test_pool};

#[tokio::test]
async fn test_seed_creates_admin_once() {
    let pool = test_pool().await;

    let first = bootstrap_admin(&pool, "Trustify Admin", "admin@trustify.com", "Trustify@2025")
        .await
        .expect("seed failed");
    let SeedOutcome::Created(admin) = first else {
        panic!("expected a fresh admin");
    };
    assert_eq!(admin.role, Role::Admin);

    let second = bootstrap_admin(&pool, "Trustify Admin", "admin@trustify.com", "Other@9999")
        .await
        .expect("re-seed failed");
    let SeedOutcome::AlreadyPresent(existing) = second else {
        panic!("expected the existing admin");
    };
    assert_eq!(existing.id, admin.id);
}

#[tokio::test]
async fn test_seed_never_touches_an_existing_account() {
    let pool = test_pool().await;

    let user = signup_user(&pool, "Squatting User Here", "admin@trustify.com").await;

    let outcome = bootstrap_admin(&pool, "Trustify Admin", "admin@trustify.com", "Trustify@2025")
        .await
        .expect("seed failed");
    let SeedOutcome::AlreadyPresent(existing) = outcome else {
        panic!("expected the existing account");
    };

    // The squatter keeps their USER role; seeding must not escalate it.
    assert_eq!(existing.id, user.id);
    assert_eq!(existing.role, Role::User);
}

#[tokio::test]
async fn test_seed_validates_its_input() {
    let pool = test_pool().await;

    let err = bootstrap_admin(&pool, "Trustify Admin", "not-an-email", "Trustify@2025")
        .await
        .expect_err("bad email must fail");
    assert!(matches!(err, trustify_platform::Error::Validation(_)));
}
