//! Product and related-entity fetching
//!
//! The product row is required; everything hanging off it is optional. Once
//! the product is known, founder, revenue records and category are fetched
//! concurrently and any of them failing only leaves a gap in the view.

use revlist_common::db::{Category, EntityStore, Founder, Product, RevenueRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ViewError;
use crate::error::Cancelled;

/// Raw entities for one product page
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntities {
    pub product: Product,
    pub founder: Option<Founder>,
    pub category: Option<Category>,
    pub revenue_records: Vec<RevenueRecord>,
}

/// Fetch a product and its related records
///
/// Fails only when the product itself is missing or its lookup fails, or when
/// `cancel` fires first.
pub async fn fetch_product_entities<S: EntityStore + ?Sized>(
    store: &S,
    product_id: i64,
    cancel: &CancellationToken,
) -> Result<ProductEntities, ViewError> {
    let lookup = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        lookup = store.get_product(product_id) => lookup,
    };

    let product = match lookup {
        Ok(Some(product)) => product,
        Ok(None) => {
            debug!(product_id, "Product not found");
            return Err(ViewError::NotFound(product_id));
        }
        Err(e) => return Err(ViewError::Store(e.to_string())),
    };

    let (founder_id, category_id) = (product.founder_id, product.category_id);
    let related = async move {
        tokio::join!(
            fetch_founder(store, founder_id),
            fetch_revenue_records(store, product_id),
            fetch_category(store, category_id),
        )
    };

    let (founder, revenue_records, category) = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        related = related => related,
    };

    debug!(
        product_id,
        has_founder = founder.is_some(),
        has_category = category.is_some(),
        revenue_records = revenue_records.len(),
        "Fetched product entities"
    );

    Ok(ProductEntities {
        product,
        founder,
        category,
        revenue_records,
    })
}

async fn fetch_founder<S: EntityStore + ?Sized>(
    store: &S,
    founder_id: Option<i64>,
) -> Option<Founder> {
    let id = founder_id?;
    available("founder", id, store.get_founder(id).await)
}

async fn fetch_category<S: EntityStore + ?Sized>(
    store: &S,
    category_id: Option<i64>,
) -> Option<Category> {
    let id = category_id?;
    available("category", id, store.get_category(id).await)
}

async fn fetch_revenue_records<S: EntityStore + ?Sized>(
    store: &S,
    product_id: i64,
) -> Vec<RevenueRecord> {
    match store.list_revenue_records(product_id).await {
        Ok(records) => records,
        Err(e) => {
            warn!(product_id, error = %e, "Revenue records unavailable");
            Vec::new()
        }
    }
}

/// Collapse a secondary lookup into present/absent, logging why it is absent
fn available<T>(
    entity: &'static str,
    id: i64,
    lookup: revlist_common::Result<Option<T>>,
) -> Option<T> {
    match lookup {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            warn!(entity, id, "Referenced record not found");
            None
        }
        Err(e) => {
            warn!(entity, id, error = %e, "Related record unavailable");
            None
        }
    }
}
