//! Role/ownership lifecycle tests.
//!
//! Cover the USER <-> `STORE_OWNER` state machine, its atomic pairing with
//! store creation/deletion, and the guards around ADMIN accounts.

use trustify_core::Role;
use trustify_platform::services::{Coordinator, CreateStoreRequest, NewAccount};
use trustify_platform::{Entity, Error};

use trustify_integration_tests::{
    TEST_PASSWORD, create_store_with_owner, signup_user, store_fixture, test_pool,
};

#[tokio::test]
async fn test_promote_then_delete_store_round_trips_to_user() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    let user = signup_user(&pool, "Ravi Kulkarni Patil", "ravi@example.com").await;
    assert_eq!(user.role, Role::User);

    let store = coordinator
        .promote_to_owner(user.id, store_fixture("Kulkarni General Stores"))
        .await
        .expect("promotion failed");

    let owner = trustify_platform::services::Directory::new(&pool)
        .account(user.id)
        .await
        .expect("account lookup failed");
    assert_eq!(owner.role, Role::StoreOwner);

    coordinator
        .delete_store(store.id)
        .await
        .expect("store deletion failed");

    let back = trustify_platform::services::Directory::new(&pool)
        .account(user.id)
        .await
        .expect("account lookup failed");
    assert_eq!(back.role, Role::User, "last store gone, role must revert");
}

#[tokio::test]
async fn test_promoting_an_owner_again_is_rejected() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    let user = signup_user(&pool, "Sneha Deshmukh Rao", "sneha@example.com").await;
    coordinator
        .promote_to_owner(user.id, store_fixture("Deshmukh Trading Company"))
        .await
        .expect("promotion failed");

    let err = coordinator
        .promote_to_owner(user.id, store_fixture("Second Venture Stores"))
        .await
        .expect_err("second promotion must fail");
    assert!(matches!(
        err,
        Error::InvalidRoleTransition {
            from: Role::StoreOwner,
            to: Role::StoreOwner,
        }
    ));
}

#[tokio::test]
async fn test_owner_keeps_role_while_stores_remain() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    let first = create_store_with_owner(&pool, "Two Store Holdings One", "multi@example.com").await;
    let second = coordinator
        .create_store(CreateStoreRequest {
            store: store_fixture("Two Store Holdings Two"),
            owner_email: "multi@example.com".to_owned(),
            owner_name: None,
            owner_password: None,
        })
        .await
        .expect("second store failed");

    coordinator
        .delete_store(first.store.id)
        .await
        .expect("first deletion failed");

    let owner = trustify_platform::services::Directory::new(&pool)
        .account(second.owner.id)
        .await
        .expect("account lookup failed");
    assert_eq!(owner.role, Role::StoreOwner, "one store still remains");

    coordinator
        .delete_store(second.store.id)
        .await
        .expect("second deletion failed");

    let owner = trustify_platform::services::Directory::new(&pool)
        .account(second.owner.id)
        .await
        .expect("account lookup failed");
    assert_eq!(owner.role, Role::User);
}

#[tokio::test]
async fn test_create_store_for_unknown_email_creates_owner_directly() {
    let pool = test_pool().await;

    let outcome = create_store_with_owner(&pool, "Fresh Owner Emporium", "new@example.com").await;

    // The account never passes through USER.
    assert_eq!(outcome.owner.role, Role::StoreOwner);
    assert_eq!(outcome.store.owner_id, outcome.owner.id);
}

#[tokio::test]
async fn test_create_store_for_unknown_email_requires_owner_fields() {
    let pool = test_pool().await;

    let err = Coordinator::new(&pool)
        .create_store(CreateStoreRequest {
            store: store_fixture("Missing Owner Details"),
            owner_email: "ghost@example.com".to_owned(),
            owner_name: None,
            owner_password: None,
        })
        .await
        .expect_err("must require owner fields");

    match err {
        Error::Validation(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.field).collect();
            assert!(names.contains(&"owner_name"));
            assert!(names.contains(&"owner_password"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_admin_never_becomes_store_owner() {
    let pool = test_pool().await;

    trustify_platform::seed::bootstrap_admin(
        &pool,
        "Trustify Admin",
        "admin@trustify.com",
        "Trustify@2025",
    )
    .await
    .expect("seed failed");

    let err = Coordinator::new(&pool)
        .create_store(CreateStoreRequest {
            store: store_fixture("Admin Owned Nonsense"),
            owner_email: "admin@trustify.com".to_owned(),
            owner_name: None,
            owner_password: None,
        })
        .await
        .expect_err("admin must be rejected");
    assert!(matches!(
        err,
        Error::InvalidRoleTransition {
            from: Role::Admin,
            ..
        }
    ));
}

#[tokio::test]
async fn test_delete_account_refuses_admin() {
    let pool = test_pool().await;

    let outcome = trustify_platform::seed::bootstrap_admin(
        &pool,
        "Trustify Admin",
        "admin@trustify.com",
        "Trustify@2025",
    )
    .await
    .expect("seed failed");
    let trustify_platform::seed::SeedOutcome::Created(admin) = outcome else {
        panic!("expected a fresh admin");
    };

    let err = Coordinator::new(&pool)
        .delete_account(admin.id)
        .await
        .expect_err("admin deletion must fail");
    assert!(matches!(err, Error::ForbiddenRoleChange));
}

#[tokio::test]
async fn test_delete_account_blocked_while_stores_remain() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    let outcome = create_store_with_owner(&pool, "Blocking Store Limited", "owner@example.com").await;

    let err = coordinator
        .delete_account(outcome.owner.id)
        .await
        .expect_err("deletion must be blocked");
    assert!(matches!(err, Error::OwnerHasActiveStores { count: 1 }));

    coordinator
        .delete_store(outcome.store.id)
        .await
        .expect("store deletion failed");

    coordinator
        .delete_account(outcome.owner.id)
        .await
        .expect("deletion must succeed once stores are gone");

    let err = trustify_platform::services::Directory::new(&pool)
        .account(outcome.owner.id)
        .await
        .expect_err("account must be gone");
    assert!(matches!(err, Error::NotFound(Entity::Account)));
}

#[tokio::test]
async fn test_admin_created_account_allows_short_name() {
    let pool = test_pool().await;

    // Admin-created accounts use the 2-character floor, unlike signup.
    let account = Coordinator::new(&pool)
        .create_account(NewAccount {
            name: "Al".to_owned(),
            email: "al@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
            address: None,
        })
        .await
        .expect("creation failed");
    assert_eq!(account.role, Role::User);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let pool = test_pool().await;

    signup_user(&pool, "Original Person Here", "taken@example.com").await;

    let err = Coordinator::new(&pool)
        .create_account(NewAccount {
            name: "Someone Else".to_owned(),
            email: "taken@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
            address: None,
        })
        .await
        .expect_err("duplicate email must fail");
    assert!(matches!(err, Error::DuplicateEmail));
}

#[tokio::test]
async fn test_update_store_does_not_touch_lifecycle() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    let outcome = create_store_with_owner(&pool, "Renamable Store Stall", "rn@example.com").await;

    let updated = coordinator
        .update_store(
            outcome.store.id,
            "Renamed Store Premises",
            "renamed@stores.example.com",
            "2 Market Street",
        )
        .await
        .expect("update failed");
    assert_eq!(updated.name, "Renamed Store Premises");
    assert_eq!(updated.owner_id, outcome.owner.id);

    let owner = trustify_platform::services::Directory::new(&pool)
        .account(outcome.owner.id)
        .await
        .expect("account lookup failed");
    assert_eq!(owner.role, Role::StoreOwner);
}
