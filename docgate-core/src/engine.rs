//! Access decisions over a principal
//!
//! Every check takes `Option<&Principal>`: `None` means no authenticated
//! subject and always resolves to a denial. Checks are pure reads of the
//! principal and the static tables, so an [`Engine`] can be shared freely
//! across threads.
//!
//! Two call sites compare roles and they deliberately disagree:
//!
//! - [`Engine::has_role`] is an exact match (`admin` does not satisfy `manager`)
//! - [`AccessQuery::required_role`] inside [`Engine::evaluate`] is hierarchical
//!   ("manager or higher" accepts `admin`)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PolicyError;
use crate::principal::Principal;
use crate::taxonomy::{Feature, LimitKey, Permission, Role, SubscriptionTier};

/// Why a decision came out denied. Only the first unmet criterion is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    #[error("no authenticated principal")]
    Unauthenticated,

    #[error("principal expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    #[error("missing permission {0}")]
    MissingPermission(Permission),

    #[error("missing feature {0}")]
    MissingFeature(Feature),

    #[error("requires {required} subscription or higher (current: {actual})")]
    InsufficientTier {
        required: SubscriptionTier,
        actual: SubscriptionTier,
    },

    #[error("requires {required} role or higher (current: {actual})")]
    InsufficientRole { required: Role, actual: Role },

    #[error("{key} limit of {limit} reached (used: {used})")]
    LimitReached { key: LimitKey, limit: u64, used: u64 },
}

impl Denial {
    /// The lowest tier that would lift this denial, when a plan upgrade can.
    pub fn upgrade_tier(&self) -> Option<SubscriptionTier> {
        match self {
            Denial::InsufficientTier { required, .. } => Some(*required),
            Denial::MissingFeature(feature) => SubscriptionTier::lowest_offering(*feature),
            Denial::LimitReached { key, used, .. } => {
                SubscriptionTier::lowest_allowing(*key, *used)
            }
            _ => None,
        }
    }
}

/// A set of criteria that must all hold for access to be granted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_permissions: Vec<Permission>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_features: Vec<Feature>,
    /// Compared hierarchically
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_subscription: Option<SubscriptionTier>,
    /// Compared hierarchically, unlike [`Engine::has_role`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
}

impl AccessQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.required_permissions.push(permission);
        self
    }

    pub fn require_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.required_permissions.extend(permissions);
        self
    }

    pub fn require_feature(mut self, feature: Feature) -> Self {
        self.required_features.push(feature);
        self
    }

    pub fn require_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.required_features.extend(features);
        self
    }

    pub fn require_subscription(mut self, tier: SubscriptionTier) -> Self {
        self.required_subscription = Some(tier);
        self
    }

    pub fn require_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.required_permissions.is_empty()
            && self.required_features.is_empty()
            && self.required_subscription.is_none()
            && self.required_role.is_none()
    }
}

/// Settings that apply to every decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Treat principals past `expires_at` as unauthenticated
    #[serde(default = "default_enforce_expiry")]
    pub enforce_expiry: bool,

    /// Leeway in seconds when comparing against `expires_at`
    #[serde(default)]
    pub clock_skew_seconds: u64,
}

fn default_enforce_expiry() -> bool {
    true
}

impl EngineConfig {
    /// Largest accepted `clock_skew_seconds` (one day)
    pub const MAX_CLOCK_SKEW_SECONDS: u64 = 86_400;

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.clock_skew_seconds > Self::MAX_CLOCK_SKEW_SECONDS {
            return Err(PolicyError::ClockSkewTooLarge {
                seconds: self.clock_skew_seconds,
                max: Self::MAX_CLOCK_SKEW_SECONDS,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enforce_expiry: default_enforce_expiry(),
            clock_skew_seconds: 0,
        }
    }
}

/// Evaluates access checks under an [`EngineConfig`]
///
/// The current time is read per decision unless pinned with [`Engine::at`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    now: Option<DateTime<Utc>>,
}

impl Engine {
    /// Out-of-range clock skew is clamped to
    /// [`EngineConfig::MAX_CLOCK_SKEW_SECONDS`] so expiry stays enforced.
    pub fn new(mut config: EngineConfig) -> Self {
        if config.clock_skew_seconds > EngineConfig::MAX_CLOCK_SKEW_SECONDS {
            tracing::warn!(
                requested = config.clock_skew_seconds,
                max = EngineConfig::MAX_CLOCK_SKEW_SECONDS,
                "Clock skew clamped"
            );
            config.clock_skew_seconds = EngineConfig::MAX_CLOCK_SKEW_SECONDS;
        }
        Self { config, now: None }
    }

    /// Evaluate every decision as of `now`
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Resolve the subject a decision applies to: present and, when
    /// enforcement is on, not expired.
    pub(crate) fn subject<'a>(&self, principal: Option<&'a Principal>) -> Result<&'a Principal, Denial> {
        let principal = principal.ok_or(Denial::Unauthenticated)?;
        if self.config.enforce_expiry {
            let now = self.now.unwrap_or_else(Utc::now);
            let skew = self
                .config
                .clock_skew_seconds
                .min(EngineConfig::MAX_CLOCK_SKEW_SECONDS);
            let leeway = Duration::seconds(i64::try_from(skew).unwrap_or_default());
            let cutoff = now.checked_sub_signed(leeway).unwrap_or(now);
            if let Some(expired_at) = principal.expires_at
                && principal.is_expired(cutoff)
            {
                return Err(Denial::Expired { expired_at });
            }
        }
        Ok(principal)
    }

    pub fn has_permission(&self, principal: Option<&Principal>, permission: Permission) -> bool {
        self.subject(principal)
            .is_ok_and(|principal| principal.grants_permission(permission))
    }

    pub fn has_feature(&self, principal: Option<&Principal>, feature: Feature) -> bool {
        self.subject(principal)
            .is_ok_and(|principal| principal.grants_feature(feature))
    }

    /// Exact role match. `admin` does NOT satisfy `has_role(manager)`; use an
    /// [`AccessQuery`] with `required_role` for "this role or higher".
    pub fn has_role(&self, principal: Option<&Principal>, role: Role) -> bool {
        self.subject(principal)
            .is_ok_and(|principal| principal.role == role)
    }

    /// Hierarchical: a `pro` principal satisfies `free` through `pro`
    pub fn has_subscription(&self, principal: Option<&Principal>, tier: SubscriptionTier) -> bool {
        self.subject(principal)
            .is_ok_and(|principal| principal.subscription_tier.includes(tier))
    }

    /// Check every criterion of `query` in a fixed order (permissions,
    /// features, subscription, role), stopping at the first unmet one.
    pub fn evaluate(&self, principal: Option<&Principal>, query: &AccessQuery) -> Result<(), Denial> {
        let result = self.check_query(principal, query);
        match &result {
            Ok(()) => tracing::trace!(
                principal = principal.map(|p| p.id.as_str()),
                "access granted"
            ),
            Err(denial) => tracing::debug!(
                principal = principal.map(|p| p.id.as_str()),
                %denial,
                "access denied"
            ),
        }
        result
    }

    fn check_query(&self, principal: Option<&Principal>, query: &AccessQuery) -> Result<(), Denial> {
        let principal = self.subject(principal)?;

        if let Some(missing) = query
            .required_permissions
            .iter()
            .find(|permission| !principal.grants_permission(**permission))
        {
            return Err(Denial::MissingPermission(*missing));
        }

        if let Some(missing) = query
            .required_features
            .iter()
            .find(|feature| !principal.grants_feature(**feature))
        {
            return Err(Denial::MissingFeature(*missing));
        }

        if let Some(required) = query.required_subscription
            && !principal.subscription_tier.includes(required)
        {
            return Err(Denial::InsufficientTier {
                required,
                actual: principal.subscription_tier,
            });
        }

        // Hierarchical on purpose; has_role is exact.
        if let Some(required) = query.required_role
            && !principal.role.includes(required)
        {
            return Err(Denial::InsufficientRole {
                required,
                actual: principal.role,
            });
        }

        Ok(())
    }

    pub fn can_access(&self, principal: Option<&Principal>, query: &AccessQuery) -> bool {
        self.evaluate(principal, query).is_ok()
    }
}

pub fn has_permission(principal: Option<&Principal>, permission: Permission) -> bool {
    Engine::default().has_permission(principal, permission)
}

pub fn has_feature(principal: Option<&Principal>, feature: Feature) -> bool {
    Engine::default().has_feature(principal, feature)
}

/// Exact role match, see [`Engine::has_role`]
pub fn has_role(principal: Option<&Principal>, role: Role) -> bool {
    Engine::default().has_role(principal, role)
}

pub fn has_subscription(principal: Option<&Principal>, tier: SubscriptionTier) -> bool {
    Engine::default().has_subscription(principal, tier)
}

pub fn can_access(principal: Option<&Principal>, query: &AccessQuery) -> bool {
    Engine::default().can_access(principal, query)
}
