// `campus login`: email/password sign-in.

use campus_client::Campus;
use clap::Args;
use colored::Colorize;

use super::CommandResult;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "CAMPUS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub async fn run(campus: &Campus, args: LoginArgs) -> CommandResult {
    let existing = if campus.bootstrap().await {
        campus.auth().user().await
    } else {
        None
    };
    if let Some(user) = existing {
        let reauth = dialoguer::Confirm::new()
            .with_prompt(format!("Already logged in as {}. Log in again?", user.user_id))
            .default(false)
            .interact()?;
        if !reauth {
            println!("Login cancelled.");
            return Ok(());
        }
        campus.logout().await;
    }

    let email = match args.email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => dialoguer::Password::new().with_prompt("Password").interact()?,
    };

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("Signing in...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    let landing = campus.sign_in(&email, &password).await;
    spinner.finish_and_clear();
    let landing = landing?;

    let user = campus.auth().user().await;
    let role = user.as_ref().map(|u| u.role.as_str()).unwrap_or("unknown");
    println!("{} Signed in as {} ({})", "✓".green(), email.bold(), role);
    println!("  Next: {}", landing.cyan());
    Ok(())
}
