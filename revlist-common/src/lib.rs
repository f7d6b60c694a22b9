//! # Revlist Common Library
//!
//! Shared code for the revenue listing services including:
//! - Entity models (products, founders, categories, revenue records, tiers)
//! - Entity store trait and its SQLite implementation
//! - Verification tier classification
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod tier;

pub use error::{Error, Result};
pub use tier::TierBucket;
