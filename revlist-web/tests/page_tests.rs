//! Page slot driven by the real product view pipeline

mod helpers;

use revlist_common::db::{open_in_memory, SqliteEntityStore};
use revlist_web::page::{PageSlot, PageState};
use revlist_web::product_view::{build_product_view, ProductView};

use helpers::{seed_catalog, LISTED_PRODUCT_ID, MISSING_PRODUCT_ID};

async fn seeded_store() -> SqliteEntityStore {
    let pool = open_in_memory().await.unwrap();
    seed_catalog(&pool).await.unwrap();
    SqliteEntityStore::new(pool)
}

#[tokio::test]
async fn test_load_commits_product_view() {
    let store = seeded_store().await;
    let slot: PageSlot<ProductView> = PageSlot::new();

    let applied = slot
        .load(|token| {
            let store = &store;
            async move {
                PageState::from_view(build_product_view(store, LISTED_PRODUCT_ID, &token).await)
            }
        })
        .await;
    assert!(applied);

    let PageState::Ready(view) = slot.current() else {
        panic!("expected a ready view");
    };
    assert_eq!(view.product.id, LISTED_PRODUCT_ID);
    assert_eq!(view.revenue.and_then(|r| r.mrr), Some(2000.0));
}

#[tokio::test]
async fn test_missing_product_commits_not_found() {
    let store = seeded_store().await;
    let slot: PageSlot<ProductView> = PageSlot::new();

    let load = slot.begin();
    let result = build_product_view(&store, MISSING_PRODUCT_ID, load.token()).await;
    let state = PageState::from_view(result).unwrap();

    assert!(slot.commit(&load, state));
    assert_eq!(slot.current(), PageState::NotFound);
}

#[tokio::test]
async fn test_superseded_load_never_overwrites() {
    let store = seeded_store().await;
    let slot: PageSlot<ProductView> = PageSlot::new();

    // User navigates from the listed product to a missing one
    let first = slot.begin();
    let second = slot.begin();

    let first_result = build_product_view(&store, LISTED_PRODUCT_ID, first.token()).await;
    let second_result = build_product_view(&store, MISSING_PRODUCT_ID, second.token()).await;

    // The first load was cancelled before it started
    assert!(PageState::from_view(first_result).is_none());

    assert!(slot.commit(&second, PageState::from_view(second_result).unwrap()));
    assert_eq!(slot.current(), PageState::NotFound);
}

#[tokio::test]
async fn test_teardown_discards_finished_load() {
    let store = seeded_store().await;
    let slot: PageSlot<ProductView> = PageSlot::new();

    let load = slot.begin();
    let result = build_product_view(&store, LISTED_PRODUCT_ID, load.token()).await;
    slot.teardown();

    let state = PageState::from_view(result).unwrap();
    assert!(!slot.commit(&load, state));
    assert_eq!(slot.current(), PageState::Loading);
}
