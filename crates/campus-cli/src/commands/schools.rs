use campus_client::Campus;
use clap::Subcommand;
use colored::Colorize;

use super::{signed_in, CommandResult};

#[derive(Subcommand)]
pub enum SchoolsCommand {
    /// Work in the given school
    Select {
        /// School id
        id: String,

        /// Display name to remember with the selection
        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the selected school
    Clear,
}

pub async fn run(campus: &Campus, cmd: SchoolsCommand) -> CommandResult {
    signed_in(campus).await?;

    match cmd {
        SchoolsCommand::Select { id, name } => {
            let landing = campus.select_school(&id, name.as_deref()).await?;
            let label = match campus.tenant().school().await {
                Some(school) => school.name,
                None => name.unwrap_or_else(|| id.clone()),
            };
            println!("{} Working in {}", "✓".green(), label.bold());
            println!("  Next: {}", landing.cyan());
        }
        SchoolsCommand::Clear => {
            let landing = campus.tenant().clear_selection().await;
            campus.load_tenant_context().await;
            println!("{} School selection cleared", "✓".green());
            println!("  Next: {}", landing.cyan());
        }
    }
    Ok(())
}
