//! Database models

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::tier::TierBucket;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub founder_id: Option<i64>,
    pub category_id: Option<i64>,
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Founder {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub twitter_url: Option<String>,
    pub personal_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// One reported revenue figure for a product
///
/// `mrr`/`arr` stay `None` when the figure was not reported, which is not
/// the same thing as a reported zero. Rows are decoded by the store, which
/// reads `date_reported` through [`parse_report_date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub id: i64,
    pub product_id: i64,
    pub mrr: Option<f64>,
    pub arr: Option<f64>,
    pub date_reported: NaiveDate,
    pub verification_tier_id: Option<i64>,
    pub source_url: Option<String>,
}

/// Day a revenue figure was reported, from its stored text
///
/// Accepts a bare date (`2024-03-01`) as well as a timestamp, with or without
/// offset (`2024-03-01T10:00:00Z`, `2024-03-01 10:00:00`). Timestamps with an
/// offset are taken in UTC.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

/// Verification tier with its classified bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationTier {
    pub id: i64,
    pub tier_name: String,
    pub confidence_level: String,
    pub description: Option<String>,
    pub bucket: TierBucket,
}

impl<'r> FromRow<'r, SqliteRow> for VerificationTier {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let tier_name: String = row.try_get("tier_name")?;
        let stored: Option<String> = row.try_get("bucket")?;

        // Rows imported before classification was stored get classified here
        let bucket = stored
            .and_then(|s| s.parse::<TierBucket>().ok())
            .unwrap_or_else(|| TierBucket::classify(&tier_name));

        Ok(Self {
            id: row.try_get("id")?,
            tier_name,
            confidence_level: row.try_get("confidence_level")?,
            description: row.try_get("description")?,
            bucket,
        })
    }
}

/// Fields for a new product row
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub founder_id: Option<i64>,
    pub category_id: Option<i64>,
    pub date_added: DateTime<Utc>,
}

/// Fields for a new founder row
#[derive(Debug, Clone, Default)]
pub struct NewFounder {
    pub name: String,
    pub bio: Option<String>,
    pub twitter_url: Option<String>,
    pub personal_url: Option<String>,
}

/// Fields for a new revenue row
#[derive(Debug, Clone)]
pub struct NewRevenueRecord {
    pub product_id: i64,
    pub mrr: Option<f64>,
    pub arr: Option<f64>,
    pub date_reported: NaiveDate,
    pub verification_tier_id: Option<i64>,
    pub source_url: Option<String>,
}
