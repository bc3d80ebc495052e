//! Evaluate a named rule from the layered policy

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use docgate_core::{AccessPolicy, PolicyError, Principal};

use super::PrincipalArgs;
use super::check::denied;
use crate::config::PolicyLoader;

#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Rule name as it appears under [rules] in the policy
    pub name: String,

    #[command(flatten)]
    pub principal: PrincipalArgs,

    /// Policy file applied on top of the user and project policies
    #[arg(long = "policy", value_name = "FILE")]
    pub policy_file: Option<PathBuf>,
}

pub fn run(args: RuleArgs) -> Result<()> {
    let policy = PolicyLoader::load(args.policy_file.as_deref())?;
    let principal = args.principal.resolve()?;
    evaluate(&policy, &principal, &args.name)
}

fn evaluate(policy: &AccessPolicy, principal: &Principal, name: &str) -> Result<()> {
    match policy.evaluate(Some(principal), name) {
        Ok(()) => {
            println!("{name}: allowed");
            Ok(())
        }
        Err(PolicyError::Denied { denial, .. }) => {
            println!("{name}: denied: {denial}");
            Err(denied(denial))
        }
        Err(PolicyError::UnknownRule(_)) => {
            let known: Vec<&str> = policy.rule_names().collect();
            if known.is_empty() {
                bail!("No rule named '{name}' (the policy defines no rules)");
            }
            bail!("No rule named '{name}'. Known rules: {}", known.join(", "));
        }
        Err(other) => Err(other.into()),
    }
}
