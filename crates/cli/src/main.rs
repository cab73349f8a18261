//! Section Factory CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sf-cli migrate
//!
//! # Replace the catalog with the bundled six sections
//! sf-cli seed
//!
//! # Replace the catalog from a YAML file
//! sf-cli seed --file catalog.yaml
//!
//! # Create a user
//! sf-cli user create -u admin -p 'correct horse battery staple'
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Section Factory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Delete all installations and sections, then load a catalog
    Seed {
        /// Catalog YAML file (defaults to the bundled catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
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
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Plain-text password (hashed with Argon2id before storage)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::run(file.as_deref()).await?;
        }
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &SecretString::from(password)).await?;
            }
        },
    }
    Ok(())
}
