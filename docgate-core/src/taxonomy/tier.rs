//! Subscription tiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Feature, LimitKey, TierLimits};
use super::limits::{BASIC, ENTERPRISE, FREE, PRO, STANDARD};
use crate::error::TaxonomyError;

/// Subscription plan level (ordered, free lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free = 0,
    Basic = 1,
    Standard = 2,
    Pro = 3,
    Enterprise = 4,
}

impl SubscriptionTier {
    /// All tiers, lowest rank first
    pub const ALL: [SubscriptionTier; 5] = [
        SubscriptionTier::Free,
        SubscriptionTier::Basic,
        SubscriptionTier::Standard,
        SubscriptionTier::Pro,
        SubscriptionTier::Enterprise,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Basic => "basic",
            SubscriptionTier::Standard => "standard",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    /// True when this tier ranks at or above `required`
    pub fn includes(self, required: SubscriptionTier) -> bool {
        self.rank() >= required.rank()
    }

    /// Quota limits and default features for this tier
    pub fn limits(self) -> &'static TierLimits {
        match self {
            SubscriptionTier::Free => &FREE,
            SubscriptionTier::Basic => &BASIC,
            SubscriptionTier::Standard => &STANDARD,
            SubscriptionTier::Pro => &PRO,
            SubscriptionTier::Enterprise => &ENTERPRISE,
        }
    }

    /// The lowest tier whose defaults include `feature`
    pub fn lowest_offering(feature: Feature) -> Option<SubscriptionTier> {
        SubscriptionTier::ALL
            .into_iter()
            .find(|tier| tier.limits().features.contains(&feature))
    }

    /// The lowest tier whose `key` limit still admits `usage`
    pub fn lowest_allowing(key: LimitKey, usage: u64) -> Option<SubscriptionTier> {
        SubscriptionTier::ALL
            .into_iter()
            .find(|tier| tier.limits().get(key).allows(usage))
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriptionTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| TaxonomyError::UnknownTier(s.to_string()))
    }
}
