//! Data-entry helpers
//!
//! Write paths used by seeding tools and tests. Tier classification happens
//! here, once, so readers get a stored bucket instead of re-matching names.

use crate::db::models::{NewFounder, NewProduct, NewRevenueRecord};
use crate::tier::TierBucket;
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;

pub async fn insert_category(pool: &SqlitePool, name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_founder(pool: &SqlitePool, founder: &NewFounder) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO founders (name, bio, twitter_url, personal_url) VALUES (?, ?, ?, ?)",
    )
    .bind(&founder.name)
    .bind(&founder.bio)
    .bind(&founder.twitter_url)
    .bind(&founder.personal_url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a verification tier, classifying its name into a stored bucket
pub async fn insert_verification_tier(
    pool: &SqlitePool,
    tier_name: &str,
    confidence_level: &str,
    description: Option<&str>,
) -> Result<i64> {
    if tier_name.trim().is_empty() {
        return Err(Error::InvalidInput("tier name must not be empty".to_string()));
    }

    let bucket = TierBucket::classify(tier_name);
    debug!(tier_name, %bucket, "Classified verification tier");

    let result = sqlx::query(
        "INSERT INTO verification_tiers (tier_name, confidence_level, description, bucket)
         VALUES (?, ?, ?, ?)",
    )
    .bind(tier_name)
    .bind(confidence_level)
    .bind(description)
    .bind(bucket.as_str())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_product(pool: &SqlitePool, product: &NewProduct) -> Result<i64> {
    check_product(product)?;

    let result = sqlx::query(
        "INSERT INTO products (name, description, url, founder_id, category_id, date_added)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.url)
    .bind(product.founder_id)
    .bind(product.category_id)
    .bind(product.date_added)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a product under a caller-chosen id
///
/// Listing ids are public (they appear in page URLs), so imports keep them.
pub async fn insert_product_with_id(
    pool: &SqlitePool,
    id: i64,
    product: &NewProduct,
) -> Result<()> {
    if id <= 0 {
        return Err(Error::InvalidInput(format!("invalid product id {}", id)));
    }
    check_product(product)?;

    sqlx::query(
        "INSERT INTO products (id, name, description, url, founder_id, category_id, date_added)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.url)
    .bind(product.founder_id)
    .bind(product.category_id)
    .bind(product.date_added)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_revenue_record(pool: &SqlitePool, record: &NewRevenueRecord) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO revenue_data (product_id, mrr, arr, date_reported, verification_tier_id, source_url)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(record.product_id)
    .bind(record.mrr)
    .bind(record.arr)
    .bind(record.date_reported)
    .bind(record.verification_tier_id)
    .bind(&record.source_url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

fn check_product(product: &NewProduct) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(Error::InvalidInput("product name must not be empty".to_string()));
    }
    Ok(())
}
