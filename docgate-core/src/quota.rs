//! Quota checks against a principal's tier limits
//!
//! A limit is the first disallowed usage count: with `maxDocuments = 10`,
//! nine documents are within the limit and ten are not.
//!
//! Action types (`documents/upload`, `analytics/advanced`, ...) map to the
//! feature they need and the quota they consume; [`Engine::authorize_action`]
//! gates on both.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{Denial, Engine};
use crate::principal::Principal;
use crate::taxonomy::{Feature, Limit, LimitKey};

/// Headroom left under a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Remaining {
    Finite(u64),
    /// The tier has no cap for this limit
    Unbounded,
}

impl Remaining {
    pub fn is_unbounded(self) -> bool {
        matches!(self, Remaining::Unbounded)
    }

    /// The finite headroom, `None` when unbounded
    pub fn finite(self) -> Option<u64> {
        match self {
            Remaining::Finite(value) => Some(value),
            Remaining::Unbounded => None,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Finite(value) => write!(f, "{value}"),
            Remaining::Unbounded => f.write_str("unlimited"),
        }
    }
}

/// Current usage counters, keyed by limit
///
/// Limits the caller does not track are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage(BTreeMap<LimitKey, u64>);

impl Usage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: LimitKey, used: u64) -> Self {
        self.0.insert(key, used);
        self
    }

    pub fn get(&self, key: LimitKey) -> Option<u64> {
        self.0.get(&key).copied()
    }
}

/// Snapshot of one limit for a principal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitStatus {
    pub key: LimitKey,
    pub limit: Limit,
    pub used: u64,
    pub remaining: Remaining,
    pub within: bool,
    /// Share of the limit consumed, 0.0 for unlimited
    pub percentage: f64,
}

/// Map an action type to the quota it consumes, e.g. `documents/upload`
/// consumes `maxDocuments`. Matching is by substring so namespaced actions
/// (`documents/upload/pending`) resolve too.
pub fn limit_for_action(action: &str) -> Option<LimitKey> {
    const ACTION_LIMITS: &[(&str, LimitKey)] = &[
        ("documents/upload", LimitKey::MaxDocuments),
        ("documents/create", LimitKey::MaxDocuments),
        ("users/invite", LimitKey::MaxUsers),
        ("exports/create", LimitKey::MaxExports),
        ("api/call", LimitKey::MaxApiCalls),
    ];

    ACTION_LIMITS
        .iter()
        .find(|(pattern, _)| action.contains(pattern))
        .map(|(_, key)| *key)
}

/// Map an action type to the feature it requires, matched by substring like
/// [`limit_for_action`]. Advanced search and custom integrations have no
/// [`Feature`] and stay ungated.
pub fn feature_for_action(action: &str) -> Option<Feature> {
    const ACTION_FEATURES: &[(&str, Feature)] = &[
        ("documents/bulk_operations", Feature::BulkOperations),
        ("analytics/advanced", Feature::AdvancedAnalytics),
        ("workflow/automation", Feature::WorkflowAutomation),
        ("branding/custom", Feature::CustomBranding),
    ];

    ACTION_FEATURES
        .iter()
        .find(|(pattern, _)| action.contains(pattern))
        .map(|(_, feature)| *feature)
}

impl Engine {
    /// Gate an action on the feature it requires, then on the quota it
    /// consumes given `current_usage`. Actions with neither only need a
    /// usable principal.
    pub fn authorize_action(
        &self,
        principal: Option<&Principal>,
        action: &str,
        current_usage: u64,
    ) -> Result<(), Denial> {
        let subject = self.subject(principal)?;

        if let Some(feature) = feature_for_action(action)
            && !subject.grants_feature(feature)
        {
            tracing::debug!(principal = %subject.id, action, %feature, "action needs feature");
            return Err(Denial::MissingFeature(feature));
        }

        if let Some(key) = limit_for_action(action)
            && let Limit::Finite(limit) = subject.limits().get(key)
            && current_usage >= limit
        {
            tracing::debug!(principal = %subject.id, action, %key, limit, "action over quota");
            return Err(Denial::LimitReached {
                key,
                limit,
                used: current_usage,
            });
        }

        Ok(())
    }

    /// Limit value for the principal's tier, or `None` when there is no
    /// usable principal.
    fn limit_of(&self, principal: Option<&Principal>, key: LimitKey) -> Option<Limit> {
        self.subject(principal)
            .ok()
            .map(|principal| principal.limits().get(key))
    }

    /// `true` when `current_usage` is strictly below the tier's limit
    pub fn is_within_limit(
        &self,
        principal: Option<&Principal>,
        key: LimitKey,
        current_usage: u64,
    ) -> bool {
        self.limit_of(principal, key)
            .is_some_and(|limit| limit.allows(current_usage))
    }

    /// Headroom left; `Finite(0)` without a principal or when over the limit
    pub fn remaining_limit(
        &self,
        principal: Option<&Principal>,
        key: LimitKey,
        current_usage: u64,
    ) -> Remaining {
        match self.limit_of(principal, key) {
            None => Remaining::Finite(0),
            Some(Limit::Unlimited) => Remaining::Unbounded,
            Some(Limit::Finite(limit)) => Remaining::Finite(limit.saturating_sub(current_usage)),
        }
    }

    /// Percentage of the limit consumed. Unlimited limits report `0.0`; a
    /// zero limit reports `100.0`.
    pub fn usage_percentage(
        &self,
        principal: Option<&Principal>,
        key: LimitKey,
        current_usage: u64,
    ) -> Option<f64> {
        self.limit_of(principal, key).map(|limit| percentage(limit, current_usage))
    }

    /// One [`LimitStatus`] per limit tracked in `usage`
    pub fn usage_report(&self, principal: Option<&Principal>, usage: &Usage) -> Vec<LimitStatus> {
        usage
            .0
            .iter()
            .filter_map(|(&key, &used)| {
                let limit = self.limit_of(principal, key)?;
                Some(LimitStatus {
                    key,
                    limit,
                    used,
                    remaining: self.remaining_limit(principal, key, used),
                    within: self.is_within_limit(principal, key, used),
                    percentage: percentage(limit, used),
                })
            })
            .collect()
    }
}

fn percentage(limit: Limit, used: u64) -> f64 {
    match limit {
        Limit::Unlimited => 0.0,
        Limit::Finite(0) => 100.0,
        Limit::Finite(limit) => used as f64 / limit as f64 * 100.0,
    }
}

pub fn is_within_limit(principal: Option<&Principal>, key: LimitKey, current_usage: u64) -> bool {
    Engine::default().is_within_limit(principal, key, current_usage)
}

pub fn remaining_limit(principal: Option<&Principal>, key: LimitKey, current_usage: u64) -> Remaining {
    Engine::default().remaining_limit(principal, key, current_usage)
}

pub fn usage_percentage(principal: Option<&Principal>, key: LimitKey, current_usage: u64) -> Option<f64> {
    Engine::default().usage_percentage(principal, key, current_usage)
}

pub fn usage_report(principal: Option<&Principal>, usage: &Usage) -> Vec<LimitStatus> {
    Engine::default().usage_report(principal, usage)
}

pub fn authorize_action(
    principal: Option<&Principal>,
    action: &str,
    current_usage: u64,
) -> Result<(), Denial> {
    Engine::default().authorize_action(principal, action, current_usage)
}
