use anyhow::{Context, Result, bail};
use docgate_core::AccessPolicy;
use std::path::{Path, PathBuf};

/// Env var overriding the project policy directory (useful for isolated tests)
pub const PROJECT_DIR_ENV: &str = "DOCGATE_PROJECT_CONFIG_DIR";

pub struct PolicyLoader;

impl PolicyLoader {
    /// Load merged policy (user, then project, then an explicit file).
    ///
    /// User and project files are optional; an explicit file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<AccessPolicy> {
        let mut policy = AccessPolicy::default();

        // Layer 1: User policy
        let user_path = Self::user_policy_path();
        if user_path.exists() {
            policy = policy.merge(Self::load_layer(&user_path)?);
        }

        // Layer 2: Project policy
        let project_path = Self::project_policy_path();
        if project_path.exists() {
            policy = policy.merge(Self::load_layer(&project_path)?);
        }

        // Layer 3: Explicit --policy file
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Policy file not found: {}", path.display());
            }
            policy = policy.merge(Self::load_layer(path)?);
        }

        tracing::debug!(rules = policy.rules.len(), "Policy loaded");
        Ok(policy)
    }

    fn load_layer(path: &Path) -> Result<AccessPolicy> {
        let layer = AccessPolicy::load_from_path(path)
            .with_context(|| format!("loading policy layer {}", path.display()))?;
        tracing::info!(path = %path.display(), rules = layer.rules.len(), "Applied policy layer");
        Ok(layer)
    }

    /// Get user policy path
    pub fn user_policy_path() -> PathBuf {
        docgate_paths::user_policy_path()
    }

    /// Get project policy path
    /// Can be overridden with DOCGATE_PROJECT_CONFIG_DIR
    pub fn project_policy_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_DIR_ENV) {
            PathBuf::from(dir).join(docgate_paths::POLICY_FILE)
        } else {
            PathBuf::from(".docgate").join(docgate_paths::POLICY_FILE)
        }
    }
}
