use std::path::PathBuf;
use std::sync::Arc;

use campus_client::storage::FileStorage;
use campus_client::{Campus, ClientOptions};
use clap::{Parser, Subcommand};

mod commands;

/// Campus CLI: sign in and inspect school, session and subscription state
#[derive(Parser)]
#[command(name = "campus", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend base URL (defaults to CAMPUS_API_URL, then http://localhost:8080)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the persisted token, user and selections
    #[arg(long, global = true, env = "CAMPUS_STATE_FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login(commands::login::LoginArgs),

    /// Sign out and forget all persisted state
    Logout,

    /// Show the signed-in user, school and academic session
    Whoami,

    /// Pick the school a platform admin is working in
    #[command(subcommand)]
    Schools(commands::schools::SchoolsCommand),

    /// List, browse, create and activate academic sessions
    #[command(subcommand)]
    Sessions(commands::sessions::SessionsCommand),

    /// Show the navigation menu and which items are available
    Menu(commands::menu::MenuArgs),

    /// Show subscription status and the shell chosen for a route
    Status(commands::status::StatusArgs),

    /// Show dashboard stat cards
    Stats(commands::stats::StatsArgs),
}

#[tokio::main]
async fn main() {
    campus_client::env::init_logger();
    let cli = Cli::parse();

    let mut options = ClientOptions::from_env();
    if let Some(url) = cli.api_url {
        options.base_url = url.trim_end_matches('/').to_string();
    }
    let state_file = cli.state_file.unwrap_or_else(FileStorage::default_path);
    tracing::debug!(base_url = %options.base_url, state_file = %state_file.display(), "starting");

    let campus = Campus::new(options, Arc::new(FileStorage::new(state_file)));

    let result = match cli.command {
        Commands::Login(args) => commands::login::run(&campus, args).await,
        Commands::Logout => commands::logout::run(&campus).await,
        Commands::Whoami => commands::whoami::run(&campus).await,
        Commands::Schools(cmd) => commands::schools::run(&campus, cmd).await,
        Commands::Sessions(cmd) => commands::sessions::run(&campus, cmd).await,
        Commands::Menu(args) => commands::menu::run(&campus, args).await,
        Commands::Status(args) => commands::status::run(&campus, args).await,
        Commands::Stats(args) => commands::stats::run(&campus, args).await,
    };

    commands::print_notifications(&campus);
    campus.teardown().await;

    if let Err(e) = result {
        eprintln!("{} {}", colored::Colorize::red("error:"), e);
        std::process::exit(1);
    }
}
