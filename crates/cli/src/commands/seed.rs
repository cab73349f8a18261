//! Seed the section catalog.
//!
//! Seeding is destructive: every installation and section is deleted before
//! the catalog is inserted, all in one transaction.

use std::path::Path;

use tracing::info;

use section_factory_api::db::PgStore;
use section_factory_api::seed::{self, bundled_catalog, catalog_from_file};

use super::{CliError, connect};

/// Load a catalog (the bundled one when `file` is `None`) and reseed.
///
/// The catalog is parsed and validated before connecting, so a bad file
/// never touches the database.
///
/// # Errors
///
/// Returns an error if the catalog is invalid or the database write fails.
pub async fn run(file: Option<&Path>) -> Result<(), CliError> {
    let sections = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog from file");
            catalog_from_file(path).await?
        }
        None => {
            info!("Loading bundled catalog");
            bundled_catalog()?
        }
    };
    info!(sections = sections.len(), "Catalog validated");

    let store = PgStore::new(connect().await?);
    let inserted = seed::reseed(&store, sections).await?;

    info!("Seeded {inserted} sections successfully!");
    Ok(())
}
