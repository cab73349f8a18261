//! Installation routes.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use section_factory_core::{Installation, Section, SectionId, ShopDomain, ShopDomainError};

use super::bad_query;
use crate::db::{InstallReceipt, RepositoryError};
use crate::error::{AppError, Result};
use crate::state::AppState;

const SHOP_DOMAIN_REQUIRED: &str = "Shop domain is required";

/// Body of `POST /sections/{id}/install`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub shop_domain: Option<String>,
}

/// Query of the endpoints that are scoped to one shop.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopQuery {
    pub shop_domain: Option<String>,
}

/// Response of a successful install.
#[derive(Debug, Serialize)]
pub struct InstallResponse {
    pub message: &'static str,
    pub installation: Installation,
    /// The section as it was before this install was counted.
    pub section: Section,
}

/// Response of the installed check.
#[derive(Debug, Serialize)]
pub struct InstalledResponse {
    pub installed: bool,
}

fn require_shop(raw: Option<&str>) -> Result<ShopDomain> {
    let raw = raw.ok_or_else(|| AppError::BadRequest(SHOP_DOMAIN_REQUIRED.to_owned()))?;
    ShopDomain::parse(raw).map_err(|e| match e {
        ShopDomainError::Empty => AppError::BadRequest(SHOP_DOMAIN_REQUIRED.to_owned()),
        ShopDomainError::TooLong { max } => {
            AppError::BadRequest(format!("Shop domain must be at most {max} characters"))
        }
    })
}

/// `POST /sections/{id}/install`
#[instrument(skip(state, payload))]
pub async fn install(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<InstallRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InstallResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let shop = require_shop(request.shop_domain.as_deref())?;

    let section_id =
        SectionId::parse(&id).map_err(|_| AppError::NotFound("Section not found".to_owned()))?;

    let InstallReceipt {
        installation,
        section,
    } = state
        .store()
        .install(section_id, &shop)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Section not found".to_owned()),
            RepositoryError::Conflict(_) => {
                AppError::Conflict("Section already installed".to_owned())
            }
            other => AppError::Database(other),
        })?;

    info!(
        section_id = %section.id,
        shop_domain = %shop,
        installation_id = %installation.id,
        "Section installed"
    );

    Ok((
        StatusCode::CREATED,
        Json(InstallResponse {
            message: "Section installed successfully",
            installation,
            section,
        }),
    ))
}

/// `GET /sections/{id}/installed?shopDomain=`
#[instrument(skip(state, query))]
pub async fn installed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: std::result::Result<Query<ShopQuery>, QueryRejection>,
) -> Result<Json<InstalledResponse>> {
    let Query(query) = query.map_err(|e| bad_query(&e))?;
    let shop = require_shop(query.shop_domain.as_deref())?;

    // An id that cannot exist cannot be installed.
    let installed = match SectionId::parse(&id) {
        Ok(section_id) => state.store().is_installed(section_id, &shop).await?,
        Err(_) => false,
    };

    Ok(Json(InstalledResponse { installed }))
}

/// `GET /installations?shopDomain=`
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ShopQuery>, QueryRejection>,
) -> Result<Json<Vec<Installation>>> {
    let Query(query) = query.map_err(|e| bad_query(&e))?;
    let shop = require_shop(query.shop_domain.as_deref())?;

    let installations = state.store().installations_for_shop(&shop).await?;
    Ok(Json(installations))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_shop() {
        assert_eq!(
            require_shop(Some(" demo.myshopify.com ")).unwrap().as_str(),
            "demo.myshopify.com"
        );
        assert!(matches!(require_shop(None), Err(AppError::BadRequest(_))));
        assert!(matches!(
            require_shop(Some("   ")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_require_shop_too_long() {
        let long = "a".repeat(ShopDomain::MAX_LENGTH + 1);
        match require_shop(Some(&long)) {
            Err(AppError::BadRequest(message)) => assert_eq!(
                message,
                format!("Shop domain must be at most {} characters", ShopDomain::MAX_LENGTH)
            ),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_install_request_uses_camel_case() {
        let body: InstallRequest =
            serde_json::from_str(r#"{"shopDomain":"demo.myshopify.com"}"#).unwrap();
        assert_eq!(body.shop_domain.as_deref(), Some("demo.myshopify.com"));

        let body: InstallRequest = serde_json::from_str("{}").unwrap();
        assert!(body.shop_domain.is_none());
    }
}
