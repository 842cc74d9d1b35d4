use campus_client::Campus;
use colored::Colorize;

use super::CommandResult;

pub async fn run(campus: &Campus) -> CommandResult {
    // Credentials only; logging out needs no tenant context.
    let was_signed_in = campus.auth().rehydrate().await;
    campus.logout().await;
    if was_signed_in {
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in; local state cleared.");
    }
    Ok(())
}
