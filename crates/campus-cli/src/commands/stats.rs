use campus_client::Campus;
use clap::Args;
use colored::Colorize;

use super::{signed_in, CommandResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

pub async fn run(campus: &Campus, args: StatsArgs) -> CommandResult {
    signed_in(campus).await?;

    let dashboard = campus.dashboard().await;
    if let Some(ref view) = dashboard {
        if !view.shows_stats() && !args.json {
            println!("{}", view.title().dimmed());
        }
    }

    let stats = campus.load_dashboard_stats().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Dashboard".bold());
    println!("  Students:       {}", stats.students);
    println!("  Classes:        {}", stats.classes);
    println!("  Staff:          {}", stats.staff);
    println!("  Fees collected: {:.2}", stats.fees_collected);
    Ok(())
}
