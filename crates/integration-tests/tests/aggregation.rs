//! Aggregation tests: rounding, the unrated sentinel and dashboards.

use trustify_platform::services::{Aggregation, CreateStoreRequest, Coordinator, RatingLedger};
use trustify_platform::{Entity, Error};

use trustify_integration_tests::{create_store_with_owner, signup_user, store_fixture, test_pool};

#[tokio::test]
async fn test_average_rounds_to_one_decimal() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let outcome = create_store_with_owner(&pool, "Averaged Store Goods", "owner@example.com").await;
    let a = signup_user(&pool, "First Rater Account", "a@example.com").await;
    let b = signup_user(&pool, "Second Rater Account", "b@example.com").await;

    ledger
        .submit(a.id, outcome.store.id, 4)
        .await
        .expect("submit failed");
    ledger
        .submit(b.id, outcome.store.id, 5)
        .await
        .expect("submit failed");

    let average = Aggregation::new(&pool)
        .average_for_store(outcome.store.id)
        .await
        .expect("aggregation failed")
        .expect("store is rated");
    assert!((average - 4.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_thirds_round_half_up() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let outcome = create_store_with_owner(&pool, "Thirds Rounding Shop", "owner@example.com").await;
    let raters = [
        signup_user(&pool, "Rounding Rater One", "r1@example.com").await,
        signup_user(&pool, "Rounding Rater Two", "r2@example.com").await,
        signup_user(&pool, "Rounding Rater Three", "r3@example.com").await,
    ];

    // [1, 5, 5] -> 3.666... -> 3.7
    for (rater, value) in raters.iter().zip([1, 5, 5]) {
        ledger
            .submit(rater.id, outcome.store.id, value)
            .await
            .expect("submit failed");
    }

    let average = Aggregation::new(&pool)
        .average_for_store(outcome.store.id)
        .await
        .expect("aggregation failed")
        .expect("store is rated");
    assert!((average - 3.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unrated_store_reports_none_not_zero() {
    let pool = test_pool().await;

    let outcome = create_store_with_owner(&pool, "Unrated Store Corner", "owner@example.com").await;

    let average = Aggregation::new(&pool)
        .average_for_store(outcome.store.id)
        .await
        .expect("aggregation failed");
    assert!(average.is_none());
}

#[tokio::test]
async fn test_average_for_unknown_store_is_not_found() {
    let pool = test_pool().await;

    let err = Aggregation::new(&pool)
        .average_for_store(trustify_core::StoreId::new(424_242))
        .await
        .expect_err("unknown store must fail");
    assert!(matches!(err, Error::NotFound(Entity::Store)));
}

#[tokio::test]
async fn test_owner_dashboard_uses_mean_of_means() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    // One owner, two stores with very different rating volume.
    let first = create_store_with_owner(&pool, "Dashboard Store East", "owner@example.com").await;
    let second = Coordinator::new(&pool)
        .create_store(CreateStoreRequest {
            store: store_fixture("Dashboard Store West"),
            owner_email: "owner@example.com".to_owned(),
            owner_name: None,
            owner_password: None,
        })
        .await
        .expect("second store failed");

    let raters = [
        signup_user(&pool, "Dashboard Rater One", "d1@example.com").await,
        signup_user(&pool, "Dashboard Rater Two", "d2@example.com").await,
        signup_user(&pool, "Dashboard Rater Three", "d3@example.com").await,
    ];

    // East: three 5s (mean 5.0). West: one 1 (mean 1.0).
    for rater in &raters {
        ledger
            .submit(rater.id, first.store.id, 5)
            .await
            .expect("submit failed");
    }
    ledger
        .submit(raters[0].id, second.store.id, 1)
        .await
        .expect("submit failed");

    let dashboard = Aggregation::new(&pool)
        .owner_dashboard(first.owner.id)
        .await
        .expect("dashboard failed");

    assert_eq!(dashboard.stores.len(), 2);
    assert_eq!(dashboard.total_ratings, 4);

    // Mean of means: (5.0 + 1.0) / 2 = 3.0, not the pooled (5+5+5+1)/4 = 4.0.
    let overall = dashboard.overall_average.expect("stores are rated");
    assert!((overall - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_owner_dashboard_excludes_unrated_stores_from_overall() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let first = create_store_with_owner(&pool, "Rated Sibling Store", "owner@example.com").await;
    Coordinator::new(&pool)
        .create_store(CreateStoreRequest {
            store: store_fixture("Unrated Sibling Store"),
            owner_email: "owner@example.com".to_owned(),
            owner_name: None,
            owner_password: None,
        })
        .await
        .expect("second store failed");

    let rater = signup_user(&pool, "Only Rater Around", "only@example.com").await;
    ledger
        .submit(rater.id, first.store.id, 4)
        .await
        .expect("submit failed");

    let dashboard = Aggregation::new(&pool)
        .owner_dashboard(first.owner.id)
        .await
        .expect("dashboard failed");

    // The unrated store shows up as None but must not drag the overall down.
    assert_eq!(dashboard.stores.len(), 2);
    assert!(dashboard.stores.iter().any(|s| s.average_rating.is_none()));
    let overall = dashboard.overall_average.expect("one store is rated");
    assert!((overall - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_owner_dashboard_with_no_ratings_at_all() {
    let pool = test_pool().await;

    let outcome = create_store_with_owner(&pool, "Silent Store Premises", "owner@example.com").await;

    let dashboard = Aggregation::new(&pool)
        .owner_dashboard(outcome.owner.id)
        .await
        .expect("dashboard failed");
    assert!(dashboard.overall_average.is_none());
    assert_eq!(dashboard.total_ratings, 0);
}

#[tokio::test]
async fn test_platform_stats_count_everything() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let rater = signup_user(&pool, "Counted Rater Person", "count@example.com").await;
    let outcome = create_store_with_owner(&pool, "Counted Store Bazaar", "owner@example.com").await;
    ledger
        .submit(rater.id, outcome.store.id, 3)
        .await
        .expect("submit failed");

    let stats = Aggregation::new(&pool)
        .platform_stats()
        .await
        .expect("stats failed");
    assert_eq!(stats.total_accounts, 2); // rater + owner
    assert_eq!(stats.total_stores, 1);
    assert_eq!(stats.total_ratings, 1);
}
