//! Integration tests for the revlist-web HTTP API
//!
//! Router driven through `oneshot` against a seeded SQLite database.

mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use revlist_common::db::{
    connect_readonly, init_database, open_in_memory, Category, EntityStore, Founder, Product,
    RevenueRecord, SqliteEntityStore, VerificationTier,
};
use revlist_web::api::get_product;
use revlist_web::payment::{PaymentVerifier, PollPolicy, VerificationError, VerifiedPayment};
use revlist_web::{build_router, AppState};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use helpers::{seed_catalog, LISTED_PRODUCT_ID, MISSING_PRODUCT_ID, NEW_PRODUCT_ID};

/// Verifier that must never be reached
struct UnreachableVerifier;

#[async_trait]
impl PaymentVerifier for UnreachableVerifier {
    async fn verify(
        &self,
        _payment_id: &str,
        _processor: &str,
    ) -> Result<VerifiedPayment, VerificationError> {
        panic!("verification endpoint called without payment parameters");
    }
}

fn app_for(pool: SqlitePool) -> axum::Router {
    build_router(AppState::new(
        Arc::new(SqliteEntityStore::new(pool)),
        Arc::new(UnreachableVerifier),
        PollPolicy::single_shot(),
    ))
}

async fn create_test_app() -> (axum::Router, SqlitePool) {
    let pool = open_in_memory().await.expect("in-memory database");
    seed_catalog(&pool).await.expect("seed catalog");
    (app_for(pool.clone()), pool)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = create_test_app().await;
    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "revlist-web");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_product_with_latest_revenue() {
    let (app, _pool) = create_test_app().await;
    let (status, json) = get_json(app, &format!("/api/products/{}", LISTED_PRODUCT_ID)).await;

    assert_eq!(status, StatusCode::OK);

    let view = &json["view"];
    assert_eq!(view["product"]["id"], LISTED_PRODUCT_ID);
    assert_eq!(view["founder"]["name"], "Ada Builder");
    assert_eq!(view["category"]["name"], "Developer Tools");
    assert_eq!(view["revenue"]["mrr"], 2000.0);
    assert_eq!(view["revenue"]["date_reported"], "2024-03-01");
    assert_eq!(view["verification_tier"]["tier_name"], "Tier 2 – Founder Reported");
    assert_eq!(view["badge"]["bucket"], "founder_reported");

    let display = &json["display"];
    assert_eq!(display["mrr"], "$2,000");
    assert_eq!(display["arr"], "$24,000");
    assert_eq!(display["added"], "March 2024");
    assert_eq!(display["badge_label"], "Founder Reported");
    assert_eq!(display["badge_confidence"], "Medium confidence");
    assert_eq!(
        display["source_url"],
        "https://indiehackers.example/shipfast"
    );
}

#[tokio::test]
async fn test_product_without_relations() {
    let (app, _pool) = create_test_app().await;
    let (status, json) = get_json(app, &format!("/api/products/{}", NEW_PRODUCT_ID)).await;

    assert_eq!(status, StatusCode::OK);

    let view = &json["view"];
    assert!(view["founder"].is_null());
    assert!(view["category"].is_null());
    assert!(view["revenue"].is_null());
    assert!(view["verification_tier"].is_null());
    assert_eq!(view["badge"]["bucket"], "none");

    let display = &json["display"];
    assert_eq!(display["description"], "No description available");
    assert_eq!(display["mrr"], "N/A");
    assert_eq!(display["arr"], "N/A");
    assert!(display["badge_label"].is_null());
    assert_eq!(
        display["verification_description"],
        "No verification information available"
    );
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let (app, _pool) = create_test_app().await;
    let (status, json) = get_json(app, &format!("/api/products/{}", MISSING_PRODUCT_ID)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert!(json.get("view").is_none());
}

#[tokio::test]
async fn test_invalid_product_id() {
    let (app, _pool) = create_test_app().await;

    let (status, json) = get_json(app.clone(), "/api/products/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");

    // Non-numeric ids are rejected by the path extractor
    let (status, _) = get_json(app, "/api/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_closed_store_is_503() {
    let (app, pool) = create_test_app().await;
    pool.close().await;

    let (status, json) = get_json(app, &format!("/api/products/{}", LISTED_PRODUCT_ID)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_repeated_loads_are_identical() {
    let (app, _pool) = create_test_app().await;
    let uri = format!("/api/products/{}", LISTED_PRODUCT_ID);

    let (_, first) = get_json(app.clone(), &uri).await;
    let (_, second) = get_json(app, &uri).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_payment_without_params_is_unavailable() {
    let (app, _pool) = create_test_app().await;

    for uri in [
        "/api/payments/status",
        "/api/payments/status?processor=stripe",
        "/api/payments/status?payment_id=pay_123",
        "/api/payments/status?payment_id=&processor=stripe",
    ] {
        let (status, json) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(json, serde_json::json!({ "state": "unavailable" }), "{}", uri);
    }
}

#[tokio::test]
async fn test_file_database_served_read_only() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("revlist.db");

    let writer = init_database(&db_path).await.unwrap();
    seed_catalog(&writer).await.unwrap();
    writer.close().await;

    let pool = connect_readonly(&db_path).await.unwrap();
    let app = app_for(pool);

    let (status, json) = tokio::time::timeout(
        Duration::from_secs(5),
        get_json(app, &format!("/api/products/{}", LISTED_PRODUCT_ID)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["view"]["revenue"]["mrr"], 2000.0);
}

/// Sets its flag when dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Store whose product lookup never answers
#[derive(Default)]
struct HangingStore {
    abandoned: Arc<AtomicBool>,
}

#[async_trait]
impl EntityStore for HangingStore {
    async fn get_product(&self, _id: i64) -> revlist_common::Result<Option<Product>> {
        let _flag = DropFlag(self.abandoned.clone());
        std::future::pending().await
    }

    async fn get_founder(&self, _id: i64) -> revlist_common::Result<Option<Founder>> {
        Ok(None)
    }

    async fn get_category(&self, _id: i64) -> revlist_common::Result<Option<Category>> {
        Ok(None)
    }

    async fn list_revenue_records(
        &self,
        _product_id: i64,
    ) -> revlist_common::Result<Vec<RevenueRecord>> {
        Ok(Vec::new())
    }

    async fn get_verification_tier(
        &self,
        _id: i64,
    ) -> revlist_common::Result<Option<VerificationTier>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_abandoned_request_stops_its_load() {
    let store = Arc::new(HangingStore::default());
    let abandoned = store.abandoned.clone();
    let state = AppState::new(store, Arc::new(UnreachableVerifier), PollPolicy::single_shot());

    // Client gives up before the product lookup answers
    let request = get_product(State(state), Path(LISTED_PRODUCT_ID));
    assert!(tokio::time::timeout(Duration::from_millis(50), request)
        .await
        .is_err());

    // The spawned load is cancelled and drops the pending lookup
    tokio::time::timeout(Duration::from_secs(2), async {
        while !abandoned.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("load kept running after the request was dropped");
}

#[tokio::test]
async fn test_timestamped_revenue_still_shown() {
    let (app, pool) = create_test_app().await;
    sqlx::query("INSERT INTO revenue_data (product_id, mrr, date_reported) VALUES (?, ?, ?)")
        .bind(NEW_PRODUCT_ID)
        .bind(500.0)
        .bind("2024-07-01T08:15:00Z")
        .execute(&pool)
        .await
        .unwrap();

    let (status, json) = get_json(app, &format!("/api/products/{}", NEW_PRODUCT_ID)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["view"]["revenue"]["mrr"], 500.0);
    assert_eq!(json["view"]["revenue"]["date_reported"], "2024-07-01");
}
