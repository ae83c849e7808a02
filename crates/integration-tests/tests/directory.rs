//! Directory tests: pagination, filters and the browse view.

use trustify_core::Role;
use trustify_platform::PageRequest;
use trustify_platform::db::{AccountFilter, StoreFilter};
use trustify_platform::services::{Coordinator, Directory, NewAccount, RatingLedger};

use trustify_integration_tests::{
    TEST_PASSWORD, create_store_with_owner, signup_user, test_pool,
};

#[tokio::test]
async fn test_account_listing_pages_are_consistent() {
    let pool = test_pool().await;
    let coordinator = Coordinator::new(&pool);

    for i in 0..25 {
        coordinator
            .create_account(NewAccount {
                name: format!("Listed Account {i:02}"),
                email: format!("listed{i}@example.com"),
                password: TEST_PASSWORD.to_owned(),
                address: None,
            })
            .await
            .expect("creation failed");
    }

    let directory = Directory::new(&pool);
    let page = directory
        .list_accounts(&AccountFilter::default(), PageRequest::new(1, 10))
        .await
        .expect("listing failed");

    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items.len(), 10);

    let last = directory
        .list_accounts(&AccountFilter::default(), PageRequest::new(3, 10))
        .await
        .expect("listing failed");
    assert_eq!(last.items.len(), 5);

    // A page past the end is empty but keeps the true total.
    let beyond = directory
        .list_accounts(&AccountFilter::default(), PageRequest::new(9, 10))
        .await
        .expect("listing failed");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 25);
}

#[tokio::test]
async fn test_account_filters_are_case_insensitive_substrings() {
    let pool = test_pool().await;

    signup_user(&pool, "Margaret Hamilton Jr", "margaret@nasa.example.com").await;
    signup_user(&pool, "Grace Hopper Rear Adm", "grace@navy.example.com").await;

    let directory = Directory::new(&pool);

    let filter = AccountFilter {
        name: Some("HAMIL".to_owned()),
        ..AccountFilter::default()
    };
    let page = directory
        .list_accounts(&filter, PageRequest::default())
        .await
        .expect("listing failed");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Margaret Hamilton Jr");

    let filter = AccountFilter {
        role: Some(Role::StoreOwner),
        ..AccountFilter::default()
    };
    let page = directory
        .list_accounts(&filter, PageRequest::default())
        .await
        .expect("listing failed");
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_store_listing_carries_owner_and_rounded_average() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let outcome = create_store_with_owner(&pool, "Directory Store Unit", "owner@example.com").await;
    let raters = [
        signup_user(&pool, "Directory Rater One", "dr1@example.com").await,
        signup_user(&pool, "Directory Rater Two", "dr2@example.com").await,
        signup_user(&pool, "Directory Rater Three", "dr3@example.com").await,
    ];
    for (rater, value) in raters.iter().zip([1, 5, 5]) {
        ledger
            .submit(rater.id, outcome.store.id, value)
            .await
            .expect("submit failed");
    }

    let page = Directory::new(&pool)
        .list_stores(&StoreFilter::default(), PageRequest::default())
        .await
        .expect("listing failed");

    assert_eq!(page.total, 1);
    let entry = &page.items[0];
    assert_eq!(entry.owner.id, outcome.owner.id);
    assert_eq!(entry.owner.role, Role::StoreOwner);

    // 11/3 = 3.666... rounds to 3.7 at the read edge.
    let average = entry.average_rating.expect("store is rated");
    assert!((average - 3.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_store_count_and_page_use_the_same_filter() {
    let pool = test_pool().await;

    create_store_with_owner(&pool, "Matching Name Stores", "o1@example.com").await;
    create_store_with_owner(&pool, "Different Label Mart", "o2@example.com").await;

    let filter = StoreFilter {
        name: Some("matching".to_owned()),
        ..StoreFilter::default()
    };
    let page = Directory::new(&pool)
        .list_stores(&filter, PageRequest::default())
        .await
        .expect("listing failed");

    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Matching Name Stores");
}

#[tokio::test]
async fn test_browse_includes_viewer_rating_and_sentinel() {
    let pool = test_pool().await;
    let ledger = RatingLedger::new(&pool);

    let viewer = signup_user(&pool, "Browsing Viewer Here", "viewer@example.com").await;
    let rated = create_store_with_owner(&pool, "Browsed And Rated Co", "o1@example.com").await;
    create_store_with_owner(&pool, "Browsed Unrated Co", "o2@example.com").await;

    ledger
        .submit(viewer.id, rated.store.id, 4)
        .await
        .expect("submit failed");

    let stores = Directory::new(&pool)
        .browse_stores(viewer.id, None)
        .await
        .expect("browse failed");
    assert_eq!(stores.len(), 2);

    let rated_entry = stores
        .iter()
        .find(|s| s.id == rated.store.id)
        .expect("rated store listed");
    assert_eq!(rated_entry.my_rating, Some(4));
    assert!((rated_entry.overall_rating.expect("rated") - 4.0).abs() < f64::EPSILON);

    let unrated_entry = stores
        .iter()
        .find(|s| s.id != rated.store.id)
        .expect("unrated store listed");
    assert!(unrated_entry.my_rating.is_none());
    assert!(unrated_entry.overall_rating.is_none());
}

#[tokio::test]
async fn test_browse_query_matches_name_or_address() {
    let pool = test_pool().await;

    let viewer = signup_user(&pool, "Searching Viewer Now", "search@example.com").await;
    create_store_with_owner(&pool, "Needle Point Stores", "o1@example.com").await;
    create_store_with_owner(&pool, "Haystack Warehouse X", "o2@example.com").await;

    let stores = Directory::new(&pool)
        .browse_stores(viewer.id, Some("needle"))
        .await
        .expect("browse failed");
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].name, "Needle Point Stores");

    // Address substring matches too; both fixtures share "Market Street".
    let stores = Directory::new(&pool)
        .browse_stores(viewer.id, Some("market street"))
        .await
        .expect("browse failed");
    assert_eq!(stores.len(), 2);
}
