// `campus sessions`: academic sessions of the current school.

use campus_client::{Campus, CreateSessionRequest};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;

use super::{signed_in, CommandResult};

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List sessions; `*` marks the one being browsed
    List,

    /// Browse a session without activating it
    Use {
        /// Session id
        id: String,
    },

    /// Create a session
    Create {
        /// Display name, e.g. 2025/26
        #[arg(long)]
        name: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Make it the school-wide active session
        #[arg(long)]
        active: bool,
    },

    /// Make a session the school-wide active one
    Activate {
        /// Session id
        id: String,
    },
}

pub async fn run(campus: &Campus, cmd: SessionsCommand) -> CommandResult {
    signed_in(campus).await?;

    match cmd {
        SessionsCommand::List => list(campus).await,
        SessionsCommand::Use { id } => {
            campus.sessions().select_session(&id).await?;
            println!("{} Browsing session {}", "✓".green(), id.bold());
            Ok(())
        }
        SessionsCommand::Create {
            name,
            start,
            end,
            active,
        } => {
            if let (Some(start), Some(end)) = (start, end) {
                if end < start {
                    return Err("--end must not be before --start".into());
                }
            }
            let request = CreateSessionRequest {
                name,
                start_date: start,
                end_date: end,
                active,
            };
            let landing = campus.create_session(&request).await?;
            println!("  Next: {}", landing.cyan());
            Ok(())
        }
        SessionsCommand::Activate { id } => {
            campus.sessions().activate_session(&id).await?;
            println!("{} Session {} is now active", "✓".green(), id.bold());
            Ok(())
        }
    }
}

async fn list(campus: &Campus) -> CommandResult {
    let snapshot = campus.sessions().snapshot().await;
    if snapshot.tenant_id.is_none() {
        return Err("no school selected; run `campus schools select <id>`".into());
    }
    if snapshot.sessions.is_empty() {
        println!("{}", "No academic sessions yet. Create one with `campus sessions create`.".yellow());
        return Ok(());
    }

    let current = snapshot.current.as_ref().map(|s| s.id.as_str());
    for session in &snapshot.sessions {
        let marker = if Some(session.id.as_str()) == current { "*".green().bold() } else { " ".normal() };
        let active = if session.active { " (active)".green() } else { "".normal() };
        let dates = match (session.start_date, session.end_date) {
            (Some(start), Some(end)) => format!("  {} → {}", start, end),
            (Some(start), None) => format!("  from {}", start),
            _ => String::new(),
        };
        println!("{} {:<10} {}{}{}", marker, session.id, session.name, active, dates.dimmed());
    }
    Ok(())
}
