//! Product catalog fixture

use chrono::{NaiveDate, TimeZone, Utc};
use revlist_common::db::{
    insert_category, insert_founder, insert_product_with_id, insert_revenue_record,
    insert_verification_tier, NewFounder, NewProduct, NewRevenueRecord,
};
use revlist_common::Result;
use sqlx::SqlitePool;

/// Product with founder, category and two revenue reports
pub const LISTED_PRODUCT_ID: i64 = 42;
/// Product with no founder, category or revenue
pub const NEW_PRODUCT_ID: i64 = 7;
pub const MISSING_PRODUCT_ID: i64 = 99;

pub struct SeededCatalog {
    pub founder_id: i64,
    pub category_id: i64,
    pub tier_id: i64,
    pub latest_revenue_id: i64,
}

pub async fn seed_catalog(pool: &SqlitePool) -> Result<SeededCatalog> {
    let category_id = insert_category(pool, "Developer Tools").await?;
    let founder_id = insert_founder(
        pool,
        &NewFounder {
            name: "Ada Builder".to_string(),
            bio: Some("Ships small profitable tools".to_string()),
            twitter_url: Some("https://twitter.com/adabuilds".to_string()),
            personal_url: None,
        },
    )
    .await?;
    let tier_id = insert_verification_tier(
        pool,
        "Tier 2 – Founder Reported",
        "Medium",
        Some("Revenue reported directly by the founder"),
    )
    .await?;

    insert_product_with_id(
        pool,
        LISTED_PRODUCT_ID,
        &NewProduct {
            name: "Shipfast Analytics".to_string(),
            description: Some("Privacy-friendly analytics".to_string()),
            url: Some("https://shipfast.example".to_string()),
            founder_id: Some(founder_id),
            category_id: Some(category_id),
            date_added: Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap(),
        },
    )
    .await?;

    insert_revenue_record(
        pool,
        &NewRevenueRecord {
            product_id: LISTED_PRODUCT_ID,
            mrr: Some(1000.0),
            arr: Some(12000.0),
            date_reported: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            verification_tier_id: Some(tier_id),
            source_url: None,
        },
    )
    .await?;
    let latest_revenue_id = insert_revenue_record(
        pool,
        &NewRevenueRecord {
            product_id: LISTED_PRODUCT_ID,
            mrr: Some(2000.0),
            arr: Some(24000.0),
            date_reported: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            verification_tier_id: Some(tier_id),
            source_url: Some("https://indiehackers.example/shipfast".to_string()),
        },
    )
    .await?;

    insert_product_with_id(
        pool,
        NEW_PRODUCT_ID,
        &NewProduct {
            name: "Just Launched".to_string(),
            description: None,
            url: None,
            founder_id: None,
            category_id: None,
            date_added: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        },
    )
    .await?;

    Ok(SeededCatalog {
        founder_id,
        category_id,
        tier_id,
        latest_revenue_id,
    })
}
