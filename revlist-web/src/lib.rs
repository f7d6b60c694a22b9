//! revlist-web library - product detail and payment return pages
//!
//! Serves the read models behind the revenue leaderboard's product detail
//! page and the checkout return page.

use std::sync::Arc;

use axum::Router;
use revlist_common::db::EntityStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod page;
pub mod payment;
pub mod product_view;

use payment::{PaymentVerifier, PollPolicy};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Product, founder, category, revenue and tier lookups
    pub store: Arc<dyn EntityStore>,
    /// Payment verification endpoint
    pub verifier: Arc<dyn PaymentVerifier>,
    pub poll_policy: PollPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EntityStore>,
        verifier: Arc<dyn PaymentVerifier>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            store,
            verifier,
            poll_policy,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/products/:id", get(api::get_product))
        .route("/api/payments/status", get(api::get_payment_status))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
