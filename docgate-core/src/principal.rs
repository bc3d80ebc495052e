//! The authorized subject a decision is made about

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocgateError;
use crate::taxonomy::{Feature, Permission, Role, SubscriptionTier, TierLimits};

/// An authenticated subject with its role, plan and explicit grants
///
/// Built once per authentication context and never mutated by the engine.
/// Build a new value when the role or tier changes upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub subscription_tier: SubscriptionTier,
    /// Explicitly granted permissions
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    /// Explicitly granted features
    #[serde(default)]
    pub features: BTreeSet<Feature>,
    /// Extra direct grants, checked exactly like `permissions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_permissions: Option<BTreeSet<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Create a principal with no explicit grants
    pub fn new(id: impl Into<String>, role: Role, subscription_tier: SubscriptionTier) -> Self {
        Self {
            id: id.into(),
            role,
            subscription_tier,
            permissions: BTreeSet::new(),
            features: BTreeSet::new(),
            custom_permissions: None,
            expires_at: None,
        }
    }

    /// Build a principal with its role's permissions and its tier's features
    /// copied into the explicit grant sets, plus any custom grants.
    pub fn from_defaults(
        id: impl Into<String>,
        role: Role,
        subscription_tier: SubscriptionTier,
        custom_permissions: Option<Vec<Permission>>,
        custom_features: Option<Vec<Feature>>,
    ) -> Self {
        let custom_permissions: Option<BTreeSet<Permission>> =
            custom_permissions.map(|grants| grants.into_iter().collect());

        let permissions = role
            .default_permissions()
            .iter()
            .copied()
            .chain(custom_permissions.iter().flatten().copied())
            .collect();
        let features = subscription_tier
            .limits()
            .features
            .iter()
            .copied()
            .chain(custom_features.into_iter().flatten())
            .collect();

        Self {
            id: id.into(),
            role,
            subscription_tier,
            permissions,
            features,
            custom_permissions,
            expires_at: None,
        }
    }

    /// Parse a principal record from upstream identity JSON
    pub fn from_json(json: &str) -> Result<Self, DocgateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn with_custom_permissions(
        mut self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.custom_permissions = Some(permissions.into_iter().collect());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Quota limits of this principal's tier
    pub fn limits(&self) -> &'static TierLimits {
        self.subscription_tier.limits()
    }

    /// `permissions ∪ custom_permissions ∪ role defaults`
    pub fn effective_permissions(&self) -> BTreeSet<Permission> {
        self.permissions
            .iter()
            .chain(self.custom_permissions.iter().flatten())
            .chain(self.role.default_permissions())
            .copied()
            .collect()
    }

    /// `features ∪ tier defaults`
    pub fn effective_features(&self) -> BTreeSet<Feature> {
        self.features
            .iter()
            .chain(self.limits().features)
            .copied()
            .collect()
    }

    /// Membership test without building the effective set
    pub fn grants_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
            || self
                .custom_permissions
                .as_ref()
                .is_some_and(|custom| custom.contains(&permission))
            || self.role.default_permissions().contains(&permission)
    }

    pub fn grants_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature) || self.limits().features.contains(&feature)
    }

    /// True when an expiry is set and `now` is past it
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}
