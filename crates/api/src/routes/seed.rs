//! Catalog reload route.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::Result;
use crate::seed;
use crate::state::AppState;

/// Response of a successful reseed.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
}

/// `POST /seed`
///
/// Replaces the catalog with the bundled sections. Every installation is
/// deleted as well.
#[instrument(skip(state))]
pub async fn reseed(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let sections = seed::bundled_catalog()?;
    let inserted = seed::reseed(state.store(), sections).await?;
    info!(inserted, "Catalog reseeded over HTTP");

    Ok(Json(SeedResponse {
        message: "Database seeded successfully",
    }))
}
