//! Named access rules loaded from TOML
//!
//! A policy maps rule names (pages, components, actions) to [`AccessQuery`]
//! values, plus the [`EngineConfig`] every rule is evaluated under:
//!
//! ```toml
//! [engine]
//! enforce_expiry = true
//!
//! [rules.analytics_dashboard]
//! required_permissions = ["analytics:view"]
//! required_subscription = "basic"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{AccessQuery, Engine, EngineConfig};
use crate::error::PolicyError;
use crate::principal::Principal;

/// Engine settings plus a set of named rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    #[serde(default)]
    pub rules: BTreeMap<String, AccessQuery>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule
    pub fn with_rule(mut self, name: impl Into<String>, query: AccessQuery) -> Self {
        self.rules.insert(name.into(), query);
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PolicyError> {
        let policy: Self = toml::from_str(contents)?;
        if let Some(engine) = &policy.engine {
            engine.validate()?;
        }
        Ok(policy)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, PolicyError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let policy = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            rules = policy.rules.len(),
            "Loaded access policy"
        );
        Ok(policy)
    }

    /// Overlay `other` onto `self`: its rules replace same-named rules and its
    /// engine settings win when present.
    pub fn merge(mut self, other: AccessPolicy) -> Self {
        for (name, query) in other.rules {
            if self.rules.insert(name.clone(), query).is_some() {
                tracing::debug!(rule = %name, "Access rule overridden");
            }
        }
        self.engine = other.engine.or(self.engine);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&AccessQuery> {
        self.rules.get(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Engine settings, defaulted when the policy sets none
    pub fn engine_config(&self) -> EngineConfig {
        self.engine.clone().unwrap_or_default()
    }

    pub fn engine(&self) -> Engine {
        Engine::new(self.engine_config())
    }

    /// Evaluate a named rule. Unknown rule names are an error rather than an
    /// implicit grant.
    pub fn evaluate(&self, principal: Option<&Principal>, name: &str) -> Result<(), PolicyError> {
        self.evaluate_with(&self.engine(), principal, name)
    }

    /// Evaluate a named rule with an explicit engine (e.g. one pinned with
    /// [`Engine::at`])
    pub fn evaluate_with(
        &self,
        engine: &Engine,
        principal: Option<&Principal>,
        name: &str,
    ) -> Result<(), PolicyError> {
        let query = self.rule(name).ok_or_else(|| {
            tracing::warn!(rule = %name, "Unknown access rule, denying");
            PolicyError::UnknownRule(name.to_string())
        })?;
        engine
            .evaluate(principal, query)
            .map_err(|denial| PolicyError::Denied {
                rule: name.to_string(),
                denial,
            })
    }

    /// Boolean form of [`AccessPolicy::evaluate`]
    pub fn check(&self, principal: Option<&Principal>, name: &str) -> bool {
        self.evaluate(principal, name).is_ok()
    }
}
