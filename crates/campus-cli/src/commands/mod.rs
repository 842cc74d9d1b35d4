use campus_client::{Campus, NotificationLevel, User};
use colored::Colorize;

pub mod login;
pub mod logout;
pub mod menu;
pub mod schools;
pub mod sessions;
pub mod stats;
pub mod status;
pub mod whoami;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Restore the persisted sign-in, or fail with a hint to log in.
pub async fn signed_in(campus: &Campus) -> Result<User, Box<dyn std::error::Error>> {
    if campus.bootstrap().await {
        if let Some(user) = campus.auth().user().await {
            return Ok(user);
        }
    }
    Err("not logged in; run `campus login` first".into())
}

/// Print and clear whatever the stores raised while the command ran.
pub fn print_notifications(campus: &Campus) {
    for notification in campus.notifier().drain() {
        let label = match notification.level {
            NotificationLevel::Info => "info:".blue(),
            NotificationLevel::Success => "ok:".green(),
            NotificationLevel::Warning => "warning:".yellow(),
            NotificationLevel::Error => "error:".red(),
        };
        eprintln!("{} {}", label, notification.message);
    }
}
