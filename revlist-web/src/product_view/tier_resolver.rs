//! Verification tier lookup and badge classification

use revlist_common::db::{EntityStore, RevenueRecord, VerificationTier};
use revlist_common::TierBucket;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Cancelled;

/// Trust badge shown next to a product's revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierBadge {
    pub bucket: TierBucket,
    /// Display label; `None` when no badge is shown
    pub label: Option<&'static str>,
    /// Confidence level from the tier row ("High", "Medium", ...)
    pub confidence_level: Option<String>,
}

impl TierBadge {
    /// No badge
    pub fn none() -> Self {
        Self {
            bucket: TierBucket::None,
            label: None,
            confidence_level: None,
        }
    }

    /// Badge for the resolved tier of the current revenue record
    pub fn from_tier(tier: Option<&VerificationTier>) -> Self {
        match tier {
            Some(tier) if tier.bucket != TierBucket::None => Self {
                bucket: tier.bucket,
                label: tier.bucket.label(),
                confidence_level: Some(tier.confidence_level.clone()),
            },
            _ => Self::none(),
        }
    }

    pub fn is_shown(&self) -> bool {
        self.bucket != TierBucket::None
    }
}

/// Fetch the verification tier referenced by the current revenue record
///
/// No record, no reference, a dangling reference and a failed lookup all
/// yield `None`; only cancellation is an error.
pub async fn resolve_tier<S: EntityStore + ?Sized>(
    store: &S,
    current: Option<&RevenueRecord>,
    cancel: &CancellationToken,
) -> Result<Option<VerificationTier>, Cancelled> {
    let Some(tier_id) = current.and_then(|r| r.verification_tier_id) else {
        return Ok(None);
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Cancelled),
        result = store.get_verification_tier(tier_id) => result,
    };

    match result {
        Ok(Some(tier)) => {
            debug!(tier_id, bucket = %tier.bucket, "Resolved verification tier");
            Ok(Some(tier))
        }
        Ok(None) => {
            warn!(tier_id, "Verification tier referenced by revenue record not found");
            Ok(None)
        }
        Err(e) => {
            warn!(tier_id, error = %e, "Verification tier lookup failed");
            Ok(None)
        }
    }
}
