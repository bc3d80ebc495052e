//! Show quota usage for a tier

use anyhow::Result;
use clap::Args;
use docgate_core::{
    Engine, LimitKey, LimitStatus, Principal, Role, SubscriptionTier, Usage, limit_for_action,
};

#[derive(Debug, Args)]
pub struct QuotaArgs {
    /// Subscription tier whose limits apply
    #[arg(long)]
    pub tier: SubscriptionTier,

    /// Limit name (maxDocuments, max_users, ...)
    #[arg(long, required_unless_present = "action")]
    pub limit: Option<LimitKey>,

    /// Current usage count
    #[arg(long, default_value_t = 0)]
    pub usage: u64,

    /// Resolve the limit from an action type instead (e.g. documents/upload)
    #[arg(long, conflicts_with = "limit")]
    pub action: Option<String>,

    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: QuotaArgs) -> Result<()> {
    let key = limit_key(&args)?;

    if args.json {
        let status = status(args.tier, key, args.usage);
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for line in summary(args.tier, key, args.usage) {
        println!("{line}");
    }
    Ok(())
}

fn limit_key(args: &QuotaArgs) -> Result<LimitKey> {
    match (&args.limit, &args.action) {
        (Some(key), _) => Ok(*key),
        (None, Some(action)) => limit_for_action(action)
            .ok_or_else(|| anyhow::anyhow!("Action '{action}' does not consume a quota")),
        (None, None) => anyhow::bail!("Either a limit or --action is required"),
    }
}

fn tier_principal(tier: SubscriptionTier) -> Principal {
    // Quotas depend only on the tier; the role is irrelevant here.
    Principal::new("cli", Role::Guest, tier)
}

fn status(tier: SubscriptionTier, key: LimitKey, usage: u64) -> Vec<LimitStatus> {
    let usage = Usage::new().with(key, usage);
    Engine::default().usage_report(Some(&tier_principal(tier)), &usage)
}

fn summary(tier: SubscriptionTier, key: LimitKey, usage: u64) -> Vec<String> {
    let principal = tier_principal(tier);
    let engine = Engine::default();
    let limit = tier.limits().get(key);
    let percentage = engine
        .usage_percentage(Some(&principal), key, usage)
        .unwrap_or_default();

    vec![
        format!("{key} on {tier}: {limit}"),
        format!("  used:      {usage}"),
        format!(
            "  remaining: {}",
            engine.remaining_limit(Some(&principal), key, usage)
        ),
        format!(
            "  within:    {}",
            engine.is_within_limit(Some(&principal), key, usage)
        ),
        format!("  consumed:  {percentage:.1}%"),
    ]
}
