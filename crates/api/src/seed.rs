//! Load the section catalog from YAML.
//!
//! ## YAML Format
//!
//! ```yaml
//! sections:
//!   - name: FAQ Accordion
//!     description: Collapsible questions and answers
//!     category: FAQ Sections
//!     price: "5.99"
//!     isFree: false
//!     previewImage: /previews/faq.png
//!     liquidCode: "<details>...</details>"
//!     downloads: 567
//!     rating: "4.5"
//! ```
//!
//! Every entry is validated with [`SectionDraft::validate_seed`]; the first
//! invalid entry aborts the load so a catalog is never partially applied.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

use section_factory_core::{NewSection, SectionDraft, ValidationError};

use crate::db::{RepositoryError, SectionStore};

/// The six-section catalog shipped with the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../seed/sections.yaml");

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("section #{index} ({name}) is invalid: {source}")]
    Invalid {
        /// 1-based position in the file.
        index: usize,
        name: String,
        source: ValidationError,
    },

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Full catalog file structure.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    sections: Vec<SectionDraft>,
}

/// Parse and validate a catalog document.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the document is malformed and
/// `SeedError::Invalid` for the first section that fails validation.
pub fn parse_catalog(yaml: &str) -> Result<Vec<NewSection>, SeedError> {
    let file: CatalogFile = serde_yaml::from_str(yaml)?;

    file.sections
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let name = draft.name.clone().unwrap_or_else(|| "unnamed".to_owned());
            draft.validate_seed().map_err(|source| SeedError::Invalid {
                index: i + 1,
                name,
                source,
            })
        })
        .collect()
}

/// The bundled catalog, parsed.
///
/// # Errors
///
/// Returns an error only if the bundled file itself is broken.
pub fn bundled_catalog() -> Result<Vec<NewSection>, SeedError> {
    parse_catalog(BUNDLED_CATALOG)
}

/// Read and parse a catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub async fn catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<NewSection>, SeedError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;

    parse_catalog(&content)
}

/// Replace the store's catalog, clearing installations first.
///
/// # Errors
///
/// Returns `SeedError::Store` if the backend rejects the reseed.
#[instrument(skip(store, sections), fields(sections = sections.len()))]
pub async fn reseed(store: &dyn SectionStore, sections: Vec<NewSection>) -> Result<usize, SeedError> {
    let inserted = store.reseed(sections).await?;
    info!(inserted, "Seeded section catalog");
    Ok(inserted)
}
