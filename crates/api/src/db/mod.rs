//! Section catalog storage.
//!
//! # Tables
//!
//! - `users` - Marketplace accounts (Argon2id password hashes)
//! - `sections` - Installable storefront sections
//! - `installations` - One row per (section, shop) install
//!
//! Handlers never talk to a backend directly; they go through the
//! [`SectionStore`] trait held in [`crate::state::AppState`]. Two backends
//! implement it:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx
//! - [`MemoryStore`] - in-process, for tests and database-less runs
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p section-factory-cli -- migrate
//! ```

pub mod installations;
pub mod memory;
pub mod postgres;
pub mod sections;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use section_factory_core::{
    Installation, NewSection, Section, SectionFilter, SectionId, ShopDomain, User,
    Username,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Embedded migrations for the `PostgreSQL` backend.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate installation).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReceipt {
    /// The installation that was recorded.
    pub installation: Installation,
    /// The section as it was read before its download count was incremented.
    pub section: Section,
}

/// Storage operations behind the HTTP API.
///
/// Implementations must agree on results for identical inputs: filtering and
/// ordering follow [`SectionFilter::apply`], and [`SectionStore::install`] is
/// a single atomic conditional write.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Sections matching `filter`, ordered by creation time then insertion
    /// order, windowed by the filter's offset and limit.
    async fn list_sections(&self, filter: &SectionFilter) -> Result<Vec<Section>, RepositoryError>;

    /// A single section by id.
    async fn get_section(&self, id: SectionId) -> Result<Option<Section>, RepositoryError>;

    /// Insert a validated section.
    async fn create_section(&self, section: NewSection) -> Result<Section, RepositoryError>;

    /// Record that `shop` installed a section and bump its download count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the section does not exist and
    /// `RepositoryError::Conflict` if the shop already installed it. Neither
    /// case changes the download count.
    async fn install(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<InstallReceipt, RepositoryError>;

    /// Installations made by `shop`, oldest first.
    async fn installations_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<Installation>, RepositoryError>;

    /// Whether `shop` has installed the section.
    async fn is_installed(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<bool, RepositoryError>;

    /// Replace the whole catalog: delete every installation and section, then
    /// insert `sections` in order. Returns the number inserted.
    async fn reseed(&self, sections: Vec<NewSection>) -> Result<usize, RepositoryError>;

    /// A user by login name.
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError>;

    /// Create a user from an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(e)
}
