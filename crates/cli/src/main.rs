//! Shopping Planner CLI - Database migrations and headless operations.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sp-cli migrate
//!
//! # Archive a family's week (day defaults to today)
//! sp-cli archive --family 3 --day saturday
//!
//! # Create a user
//! sp-cli user create -e ana@example.com -n "Ana Lopez" -p 'correct horse'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `archive` - Archive a family's active list on the rollover day
//! - `user create` - Create a user without going through the API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Shopping Planner CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Archive a family's active list and open next week's
    Archive {
        /// Family ID
        #[arg(short, long)]
        family: i32,

        /// Weekday to archive as (defaults to today)
        #[arg(short, long)]
        day: Option<String>,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Archive { family, day } => {
            commands::archive::run(family, day.as_deref()).await?;
        }
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
            } => {
                commands::user::create(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
