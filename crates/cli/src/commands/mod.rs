//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use section_factory_api::config::{ConfigError, get_database_url};
use section_factory_api::db::{self, RepositoryError};
use section_factory_api::seed::SeedError;
use section_factory_core::UsernameError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The catalog could not be loaded or stored.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// Storage rejected the operation.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Username failed validation.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Password is too short.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// User already exists.
    #[error("User already exists: {0}")]
    UserExists(String),
}

/// Connect to the API database.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("API_DATABASE_URL")?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
