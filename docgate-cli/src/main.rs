use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "docgate", about = "Inspect and evaluate document access rules")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an ad-hoc access query
    Check(commands::check::CheckArgs),
    /// Manage and inspect the access policy
    Policy(commands::policy::PolicyArgs),
    /// Show quota usage for a tier
    Quota(commands::quota::QuotaArgs),
    /// Evaluate a named rule from the policy
    Rule(commands::rule::RuleArgs),
    /// Print the role and tier tables
    Tables(commands::tables::TablesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Policy(args) => commands::policy::run(args),
        Commands::Quota(args) => commands::quota::run(args),
        Commands::Rule(args) => commands::rule::run(args),
        Commands::Tables(args) => commands::tables::run(args),
    }
}
