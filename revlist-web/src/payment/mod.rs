//! Payment status pipeline
//!
//! Reconciles a returning checkout against the payment verification endpoint.
//! The outcome is always one of four payment states, or `Unavailable` when
//! the return page carried nothing to check.

pub mod client;
pub mod poll;
pub mod status;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::{VerificationClient, VerificationError};
pub use poll::PollPolicy;
pub use status::{
    resolve_payment_status, resolve_with_policy, PaymentCheck, PaymentParams, PaymentState,
    PaymentStatus,
};

/// Payment record as confirmed by the verification endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifiedPayment {
    pub status: PaymentState,
    pub payment_id: String,
    pub amount: f64,
    pub processor: String,
    /// Plan the payment was for ("Pro", ...)
    pub tier: String,
    #[serde(default)]
    pub verified: bool,
}

/// Anything that can confirm a payment with its processor
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(
        &self,
        payment_id: &str,
        processor: &str,
    ) -> Result<VerifiedPayment, VerificationError>;
}
