pub mod check;
pub mod policy;
pub mod quota;
pub mod rule;
pub mod tables;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use docgate_core::{Feature, Permission, Principal, Role, SubscriptionTier};

/// Where the principal for a decision comes from: a JSON record, or flags
#[derive(Debug, Args)]
pub struct PrincipalArgs {
    /// Read the principal from a JSON file
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["role", "tier", "grants", "feature_grants"]
    )]
    pub principal: Option<PathBuf>,

    /// Principal role
    #[arg(long)]
    pub role: Option<Role>,

    /// Principal subscription tier
    #[arg(long)]
    pub tier: Option<SubscriptionTier>,

    /// Principal identifier
    #[arg(long, default_value = "cli")]
    pub id: String,

    /// Extra custom permission grant (repeatable)
    #[arg(long = "grant", value_name = "PERMISSION")]
    pub grants: Vec<Permission>,

    /// Extra feature grant (repeatable)
    #[arg(long = "grant-feature", value_name = "FEATURE")]
    pub feature_grants: Vec<Feature>,
}

impl PrincipalArgs {
    pub fn resolve(&self) -> Result<Principal> {
        if let Some(path) = &self.principal {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading principal {}", path.display()))?;
            return Ok(Principal::from_json(&json)?);
        }

        let (Some(role), Some(tier)) = (self.role, self.tier) else {
            bail!("Either --principal or both --role and --tier are required");
        };

        let custom_permissions = (!self.grants.is_empty()).then(|| self.grants.clone());
        let custom_features = (!self.feature_grants.is_empty()).then(|| self.feature_grants.clone());
        Ok(Principal::from_defaults(
            self.id.clone(),
            role,
            tier,
            custom_permissions,
            custom_features,
        ))
    }
}
