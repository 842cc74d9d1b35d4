use campus_client::Campus;
use colored::Colorize;

use super::{signed_in, CommandResult};

pub async fn run(campus: &Campus) -> CommandResult {
    let user = signed_in(campus).await?;

    println!("{}", "Account".bold());
    println!("  User:    {}", user.name.as_deref().unwrap_or(&user.user_id));
    if let Some(ref email) = user.email {
        println!("  Email:   {}", email);
    }
    println!("  Role:    {}", user.role);

    println!("{}", "Scope".bold());
    match campus.tenant().school().await {
        Some(school) => {
            let state = if school.active { "active".green() } else { "inactive".red() };
            println!("  School:  {} ({}) [{}]", school.name, school.id, state);
        }
        None if user.is_platform_user() => {
            println!("  School:  {}", "none selected (campus schools select <id>)".dimmed())
        }
        None => println!("  School:  {}", user.school_id.as_deref().unwrap_or("-")),
    }
    match campus.sessions().current().await {
        Some(session) => println!("  Session: {} ({})", session.name, session.id),
        None => println!("  Session: {}", "none".dimmed()),
    }
    Ok(())
}
