use campus_client::{Campus, NavState};
use clap::Args;
use colored::Colorize;

use super::{signed_in, CommandResult};

#[derive(Args)]
pub struct MenuArgs {
    /// Click the item with this key and show where it leads
    #[arg(long)]
    click: Option<String>,
}

pub async fn run(campus: &Campus, args: MenuArgs) -> CommandResult {
    signed_in(campus).await?;

    if let Some(key) = args.click {
        let outcome = campus
            .click(&key)
            .await
            .ok_or_else(|| format!("no menu item named '{}'", key))?;
        println!("{}", outcome.route());
        return Ok(());
    }

    for (item, state) in campus.menu().await {
        let status = match state {
            NavState::Enabled => "enabled".green(),
            NavState::DisabledNoSchool => "needs school".yellow(),
            NavState::DisabledNoSession => "needs session".yellow(),
            NavState::DisabledNoClasses => "needs classes".yellow(),
        };
        println!("  {:<18} {:<24} {}", item.key, item.path.dimmed(), status);
    }
    Ok(())
}
