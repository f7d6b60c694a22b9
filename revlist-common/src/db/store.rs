//! Entity lookups consumed by the read-model pipelines
//!
//! `Ok(None)` means the row does not exist; `Err` means the lookup itself
//! failed. Callers decide which of the two they can tolerate.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::db::models::{
    parse_report_date, Category, Founder, Product, RevenueRecord, VerificationTier,
};
use crate::Result;

/// Key-based access to listing entities
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;

    async fn get_founder(&self, id: i64) -> Result<Option<Founder>>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// All revenue records reported for a product, in no particular order
    async fn list_revenue_records(&self, product_id: i64) -> Result<Vec<RevenueRecord>>;

    async fn get_verification_tier(&self, id: i64) -> Result<Option<VerificationTier>>;
}

/// [`EntityStore`] backed by the SQLite listing database
#[derive(Clone)]
pub struct SqliteEntityStore {
    pool: SqlitePool,
}

impl SqliteEntityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for SqliteEntityStore {
    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, url, founder_id, category_id, date_added
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn get_founder(&self, id: i64) -> Result<Option<Founder>> {
        let founder = sqlx::query_as::<_, Founder>(
            "SELECT id, name, bio, twitter_url, personal_url FROM founders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(founder)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn list_revenue_records(&self, product_id: i64) -> Result<Vec<RevenueRecord>> {
        let rows = sqlx::query(
            "SELECT id, product_id, mrr, arr, date_reported, verification_tier_id, source_url
             FROM revenue_data WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let raw_date: String = row.try_get("date_reported")?;

            // An unreadable date drops that one report, not the product's history
            let Some(date_reported) = parse_report_date(&raw_date) else {
                warn!(
                    id,
                    product_id,
                    date_reported = %raw_date,
                    "Skipping revenue record with unreadable date"
                );
                continue;
            };

            records.push(RevenueRecord {
                id,
                product_id: row.try_get("product_id")?,
                mrr: row.try_get("mrr")?,
                arr: row.try_get("arr")?,
                date_reported,
                verification_tier_id: row.try_get("verification_tier_id")?,
                source_url: row.try_get("source_url")?,
            });
        }

        Ok(records)
    }

    async fn get_verification_tier(&self, id: i64) -> Result<Option<VerificationTier>> {
        let tier = sqlx::query_as::<_, VerificationTier>(
            "SELECT id, tier_name, confidence_level, description, bucket
             FROM verification_tiers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tier)
    }
}
