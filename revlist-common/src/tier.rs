//! Verification tier classification
//!
//! A revenue figure is backed by one of three trust levels. Tier rows carry a
//! free-text `tier_name` ("Tier 1 - Verified", "Tier 2 – Founder Reported", ...);
//! the bucket is derived from that name once, when the tier is written, and
//! stored next to it. [`TierBucket::classify`] is the import step that does the
//! derivation; reads only fall back to it for rows written before the bucket
//! column existed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trust bucket for a revenue figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBucket {
    /// Independently verified ("Tier 1")
    Verified,
    /// Attested by the founder ("Tier 2")
    FounderReported,
    /// Reported by the community ("Tier 3")
    CommunityReported,
    /// No recognizable tier; no badge is shown
    None,
}

/// Substring markers in priority order. First match wins.
const TIER_MARKERS: [(&str, TierBucket); 3] = [
    ("Tier 1", TierBucket::Verified),
    ("Tier 2", TierBucket::FounderReported),
    ("Tier 3", TierBucket::CommunityReported),
];

impl TierBucket {
    /// Classify a tier name by its "Tier N" marker
    ///
    /// "Tier 1" is checked first, so a name mentioning several tiers always
    /// lands in the highest one it names.
    pub fn classify(tier_name: &str) -> Self {
        TIER_MARKERS
            .iter()
            .find(|(marker, _)| tier_name.contains(marker))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(TierBucket::None)
    }

    /// Badge label shown on the product page, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TierBucket::Verified => Some("Verified"),
            TierBucket::FounderReported => Some("Founder Reported"),
            TierBucket::CommunityReported => Some("Community Reported"),
            TierBucket::None => None,
        }
    }

    /// Stored column value
    pub fn as_str(&self) -> &'static str {
        match self {
            TierBucket::Verified => "verified",
            TierBucket::FounderReported => "founder_reported",
            TierBucket::CommunityReported => "community_reported",
            TierBucket::None => "none",
        }
    }
}

impl fmt::Display for TierBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(TierBucket::Verified),
            "founder_reported" => Ok(TierBucket::FounderReported),
            "community_reported" => Ok(TierBucket::CommunityReported),
            "none" => Ok(TierBucket::None),
            other => Err(format!("Unknown tier bucket: {}", other)),
        }
    }
}
