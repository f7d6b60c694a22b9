//! Payment status resolution

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{PaymentVerifier, PollPolicy, VerificationError, VerifiedPayment};
use crate::error::Cancelled;

const VERIFIED_MESSAGE: &str = "Payment verified successfully";
const UNKNOWN_TIER: &str = "Unknown";

/// Processor-side state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Completed,
    Failed,
    Expired,
}

impl PaymentState {
    /// Whether the processor will not change this state any more
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentState::Pending)
    }

    /// Page heading for the payment return page
    pub fn headline(&self) -> &'static str {
        match self {
            PaymentState::Completed => "Payment Successful!",
            PaymentState::Failed => "Payment Failed",
            PaymentState::Pending => "Payment Processing...",
            PaymentState::Expired => "Payment Expired",
        }
    }
}

/// Read model for the payment return page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub status: PaymentState,
    pub payment_id: String,
    pub processor: String,
    pub amount: f64,
    /// Plan name, or "Unknown" when verification failed
    pub tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentStatus {
    fn from_verified(payment: VerifiedPayment) -> Self {
        Self {
            status: payment.status,
            payment_id: payment.payment_id,
            processor: payment.processor,
            amount: payment.amount,
            tier: payment.tier,
            message: payment.verified.then(|| VERIFIED_MESSAGE.to_string()),
        }
    }

    /// Stand-in status when the verification call itself failed
    fn from_error(payment_id: &str, processor: &str, err: &VerificationError) -> Self {
        Self {
            status: PaymentState::Failed,
            payment_id: payment_id.to_string(),
            processor: processor.to_string(),
            amount: 0.0,
            tier: UNKNOWN_TIER.to_string(),
            message: Some(err.to_string()),
        }
    }
}

/// Outcome of a payment check
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentCheck {
    /// No payment id or processor to check; no request was made
    Unavailable,
    Resolved(PaymentStatus),
}

/// Return-page parameters (`?payment_id=...&processor=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentParams {
    pub payment_id: Option<String>,
    pub processor: Option<String>,
}

impl PaymentParams {
    pub fn new(payment_id: impl Into<String>, processor: impl Into<String>) -> Self {
        Self {
            payment_id: Some(payment_id.into()),
            processor: Some(processor.into()),
        }
    }

    /// Both values as given, if both are present and not blank
    ///
    /// Values are passed on untrimmed; whitespace only matters for the
    /// presence check.
    pub fn required(&self) -> Option<(&str, &str)> {
        let payment_id = self.payment_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let processor = self.processor.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((payment_id, processor))
    }
}

/// Check a payment exactly once
pub async fn resolve_payment_status<V: PaymentVerifier + ?Sized>(
    verifier: &V,
    params: &PaymentParams,
    cancel: &CancellationToken,
) -> Result<PaymentCheck, Cancelled> {
    resolve_with_policy(verifier, params, &PollPolicy::single_shot(), cancel).await
}

/// Check a payment, re-checking while it is pending as the policy allows
///
/// Stops at the first terminal state (a failed verification call counts as
/// `failed`) or when attempts run out, returning the last `pending` status.
pub async fn resolve_with_policy<V: PaymentVerifier + ?Sized>(
    verifier: &V,
    params: &PaymentParams,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<PaymentCheck, Cancelled> {
    let Some((payment_id, processor)) = params.required() else {
        debug!("No payment id or processor supplied, nothing to check");
        return Ok(PaymentCheck::Unavailable);
    };

    let span = info_span!("payment_status", load_id = %Uuid::new_v4(), payment_id, processor);

    async move {
        let mut attempt = 1;
        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Cancelled),
                outcome = verifier.verify(payment_id, processor) => outcome,
            };

            let status = match outcome {
                Ok(payment) => PaymentStatus::from_verified(payment),
                Err(e) => {
                    warn!(attempt, error = %e, "Payment verification failed");
                    PaymentStatus::from_error(payment_id, processor, &e)
                }
            };

            if status.status.is_terminal() || attempt >= policy.max_attempts {
                info!(attempt, status = ?status.status, amount = status.amount, "Payment status resolved");
                return Ok(PaymentCheck::Resolved(status));
            }

            let wait = policy.backoff_after(attempt);
            debug!(attempt, ?wait, "Payment still pending, re-checking");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
            attempt += 1;
        }
    }
    .instrument(span)
    .await
}
