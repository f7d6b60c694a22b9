//! Product view pipeline
//!
//! Builds the read model behind a product detail page:
//! fetch entities → select current revenue → resolve tier → compose.
//!
//! Only a missing product stops the pipeline. Founder, category, revenue and
//! tier are optional parts of the view and are left empty when they cannot
//! be loaded.

pub mod display;
pub mod fetcher;
pub mod selector;
pub mod tier_resolver;

use revlist_common::db::{Category, EntityStore, Founder, Product, RevenueRecord, VerificationTier};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::Cancelled;
pub use display::ProductDisplay;
pub use fetcher::{fetch_product_entities, ProductEntities};
pub use selector::select_current;
pub use tier_resolver::{resolve_tier, TierBadge};

/// Why no product view was produced
#[derive(Debug, Error)]
pub enum ViewError {
    /// No product with this id; the caller navigates away
    #[error("Product {0} not found")]
    NotFound(i64),

    /// The product lookup itself failed
    #[error("Product lookup failed: {0}")]
    Store(String),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Read model for one product page
///
/// Rebuilt on every load and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub founder: Option<Founder>,
    pub category: Option<Category>,
    /// Current revenue record (latest report)
    pub revenue: Option<RevenueRecord>,
    /// Tier referenced by `revenue`
    pub verification_tier: Option<VerificationTier>,
    pub badge: TierBadge,
}

/// Merge fetched and derived pieces into a view
pub fn compose(
    entities: ProductEntities,
    revenue: Option<RevenueRecord>,
    verification_tier: Option<VerificationTier>,
) -> ProductView {
    let badge = TierBadge::from_tier(verification_tier.as_ref());

    ProductView {
        product: entities.product,
        founder: entities.founder,
        category: entities.category,
        revenue,
        verification_tier,
        badge,
    }
}

/// Run the full product view pipeline for one page load
pub async fn build_product_view<S: EntityStore + ?Sized>(
    store: &S,
    product_id: i64,
    cancel: &CancellationToken,
) -> Result<ProductView, ViewError> {
    let span = info_span!("product_view", load_id = %Uuid::new_v4(), product_id);

    async move {
        let mut entities = fetch_product_entities(store, product_id, cancel).await?;

        let records = std::mem::take(&mut entities.revenue_records);
        let revenue = select_current(records);
        let verification_tier = resolve_tier(store, revenue.as_ref(), cancel).await?;

        let view = compose(entities, revenue, verification_tier);

        info!(
            mrr = view.revenue.as_ref().and_then(|r| r.mrr),
            bucket = %view.badge.bucket,
            "Product view composed"
        );

        Ok(view)
    }
    .instrument(span)
    .await
}
