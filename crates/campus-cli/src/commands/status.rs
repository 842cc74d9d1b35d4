use campus_client::subscription::{ExpiryWarningLevel, UsageWarningLevel};
use campus_client::{Campus, Content, Shell};
use clap::Args;
use colored::Colorize;

use super::{signed_in, CommandResult};

#[derive(Args)]
pub struct StatusArgs {
    /// Route to evaluate the page shell for
    #[arg(long, default_value = "/")]
    path: String,
}

pub async fn run(campus: &Campus, args: StatusArgs) -> CommandResult {
    signed_in(campus).await?;

    println!("{}", "Subscription".bold());
    match campus.subscription().info().await {
        Some(info) => {
            println!("  Status:  {:?}", info.status);
            if let Some(ref name) = info.plan.name {
                println!("  Plan:    {}", name);
            }
            let usage = format!(
                "{}/{} ({:.1}%)",
                info.active_students,
                info.student_cap.map_or("∞".to_string(), |c| c.to_string()),
                info.usage_percent
            );
            let usage = match info.usage_warning {
                UsageWarningLevel::None => usage.normal(),
                UsageWarningLevel::Warning => usage.yellow(),
                UsageWarningLevel::Critical => usage.red(),
            };
            println!("  Usage:   {}", usage);
            if let Some(expires_at) = info.expires_at {
                let line = format!(
                    "{} ({} days)",
                    expires_at.format("%Y-%m-%d"),
                    info.days_to_expiry.unwrap_or_default()
                );
                let line = match info.expiry_warning {
                    ExpiryWarningLevel::None => line.normal(),
                    ExpiryWarningLevel::Warning30 => line.yellow(),
                    ExpiryWarningLevel::Critical7 | ExpiryWarningLevel::Expired => line.red(),
                };
                println!("  Expires: {}", line);
                if info.in_grace_period(chrono::Utc::now()) {
                    println!("  {}", "In grace period".yellow());
                }
            }
        }
        None => println!("  {}", "unknown (no school in scope)".dimmed()),
    }

    let shell = match campus.shell_view(&args.path).await {
        Ok(shell) => shell,
        Err(screen) => {
            println!("{}", "Shell".bold());
            println!("  {}: {}", args.path, screen.message.red());
            if let Some(route) = screen.actions[1].route() {
                println!("  Return to {}", route.cyan());
            }
            return Ok(());
        }
    };
    let described = match shell {
        Shell::Bare => "bare page".normal(),
        Shell::Redirect(to) => format!("redirect to {}", to).yellow(),
        Shell::Loading => "loading".dimmed(),
        Shell::SuspensionOverlay => "suspended: only billing is reachable".red(),
        Shell::InactiveSchool => "school is inactive".red(),
        Shell::Sidebar(Content::AccessDenied) => "access denied".red(),
        Shell::Sidebar(Content::Page) => "page".green(),
    };
    println!("{}", "Shell".bold());
    println!("  {}: {}", args.path, described);
    Ok(())
}
