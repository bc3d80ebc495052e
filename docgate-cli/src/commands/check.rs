//! Evaluate an ad-hoc access query

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use docgate_core::{
    AccessQuery, Denial, Engine, Feature, Permission, Principal, Role, SubscriptionTier,
};

use super::PrincipalArgs;
use crate::config::PolicyLoader;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub principal: PrincipalArgs,

    /// Required permission (repeatable)
    #[arg(long = "permission", value_name = "PERMISSION")]
    pub permissions: Vec<Permission>,

    /// Required feature (repeatable)
    #[arg(long = "feature", value_name = "FEATURE")]
    pub features: Vec<Feature>,

    /// Required subscription tier (this tier or higher)
    #[arg(long)]
    pub require_tier: Option<SubscriptionTier>,

    /// Required role (this role or higher)
    #[arg(long)]
    pub require_role: Option<Role>,

    /// Also gate on an action type's feature and quota (e.g. documents/upload)
    #[arg(long)]
    pub action: Option<String>,

    /// Current usage of the action's quota
    #[arg(long, default_value_t = 0, requires = "action")]
    pub usage: u64,

    /// Evaluate as of this instant instead of now (RFC 3339)
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<DateTime<Utc>>,
}

impl CheckArgs {
    fn query(&self) -> AccessQuery {
        let mut query = AccessQuery::new()
            .require_permissions(self.permissions.iter().copied())
            .require_features(self.features.iter().copied());
        query.required_subscription = self.require_tier;
        query.required_role = self.require_role;
        query
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    let principal = args.principal.resolve()?;
    let mut engine = PolicyLoader::load(None)?.engine();
    if let Some(at) = args.at {
        engine = engine.at(at);
    }

    report(decide(&engine, &principal, &args))
}

fn decide(engine: &Engine, principal: &Principal, args: &CheckArgs) -> Result<(), Denial> {
    engine.evaluate(Some(principal), &args.query())?;
    if let Some(action) = &args.action {
        engine.authorize_action(Some(principal), action, args.usage)?;
    }
    Ok(())
}

fn report(decision: Result<(), Denial>) -> Result<()> {
    match decision {
        Ok(()) => {
            println!("allowed");
            Ok(())
        }
        Err(denial) => {
            println!("denied: {denial}");
            if let Some(tier) = denial.upgrade_tier() {
                println!("  upgrade to {tier} or higher to unlock");
            }
            Err(denied(denial))
        }
    }
}

/// Error returned for a denial so the process exits non-zero
pub fn denied(denial: Denial) -> anyhow::Error {
    anyhow::Error::new(denial).context("access denied")
}
