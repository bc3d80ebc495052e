//! Print the role permission table and the tier limit table

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use docgate_core::{LimitKey, Role, SubscriptionTier};

#[derive(Debug, Args)]
pub struct TablesArgs {
    #[command(subcommand)]
    pub command: TablesCommand,
}

#[derive(Debug, Subcommand)]
pub enum TablesCommand {
    /// Default permissions per role
    Roles {
        /// Only list permissions on this resource (e.g. documents)
        #[arg(long)]
        resource: Option<String>,
    },
    /// Quota limits and default features per tier
    Tiers,
}

pub fn run(args: TablesArgs) -> Result<()> {
    let table = match args.command {
        TablesCommand::Roles { resource } => roles_table(resource.as_deref()),
        TablesCommand::Tiers => tiers_table(),
    };
    println!("{table}");
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .into_iter()
            .map(|title| Cell::new(title).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn roles_table(resource: Option<&str>) -> Table {
    let mut table = new_table(vec!["Rank", "Role", "Default permissions"]);
    for role in Role::ALL {
        let permissions: Vec<&str> = role
            .default_permissions()
            .iter()
            .filter(|permission| resource.is_none() || permission.resource() == resource)
            .map(|permission| permission.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(role.rank()),
            Cell::new(role),
            Cell::new(permissions.join(", ")),
        ]);
    }
    table
}

fn tiers_table() -> Table {
    let mut header = vec!["Rank", "Tier"];
    header.extend(LimitKey::ALL.iter().map(|key| key.as_str()));
    header.push("Features");

    let mut table = new_table(header);
    for tier in SubscriptionTier::ALL {
        let limits = tier.limits();
        let mut row = vec![Cell::new(tier.rank()), Cell::new(tier)];
        row.extend(LimitKey::ALL.iter().map(|key| Cell::new(limits.get(*key))));
        let features: Vec<&str> = limits.features.iter().map(|f| f.as_str()).collect();
        row.push(Cell::new(features.join(", ")));
        table.add_row(row);
    }
    table
}
