//! Inspect the layered access policy

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::PolicyLoader;

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Show the merged policy
    Show {
        /// Policy file applied on top of the user and project policies
        #[arg(long = "policy", value_name = "FILE")]
        policy_file: Option<PathBuf>,
    },
    /// Show policy file paths
    Path,
}

pub fn run(args: PolicyArgs) -> Result<()> {
    match args.command {
        PolicyCommand::Show { policy_file } => show_policy(policy_file),
        PolicyCommand::Path => show_paths(),
    }
}

fn show_policy(policy_file: Option<PathBuf>) -> Result<()> {
    println!("{}", render_policy(policy_file.as_deref())?);
    Ok(())
}

fn render_policy(policy_file: Option<&Path>) -> Result<String> {
    let policy = PolicyLoader::load(policy_file)?;
    if policy.rules.is_empty() {
        tracing::warn!("No access rules defined; every named rule will be denied");
    }
    Ok(toml::to_string_pretty(&policy)?)
}

fn show_paths() -> Result<()> {
    println!("User policy:    {:?}", PolicyLoader::user_policy_path());
    println!("Project policy: {:?}", PolicyLoader::project_policy_path());
    Ok(())
}
