//! Shared fixtures for revlist-web integration tests
//!
//! - Seeded product database (in memory or on disk)
//! - Local stand-in for the payment verification endpoint

#![allow(dead_code)]

pub mod mock_verifier;
pub mod seed;

pub use mock_verifier::{MockVerifier, TEST_API_KEY};
pub use seed::{seed_catalog, SeededCatalog, LISTED_PRODUCT_ID, MISSING_PRODUCT_ID, NEW_PRODUCT_ID};
