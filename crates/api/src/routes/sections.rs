//! Section catalog routes.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use section_factory_core::{
    CategoryFilter, PageRequest, PriceBucket, PriceFilter, Section, SectionDraft, SectionFilter,
    SectionId, is_known_category,
};

use super::bad_query;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters accepted by `GET /sections`.
///
/// Everything arrives as text and is interpreted leniently: unusable
/// values fall back to "no restriction" or the default page.
#[derive(Debug, Default, Deserialize)]
pub struct ListSectionsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// A UI price label such as `Under $5`.
    #[serde(alias = "priceFilter")]
    pub price_filter: Option<String>,
    /// Direct free/paid flag; wins over `price_filter`.
    #[serde(alias = "isFree")]
    pub is_free: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListSectionsQuery {
    /// Translate request parameters into a query-engine filter.
    #[must_use]
    pub fn into_filter(self) -> SectionFilter {
        let price = self.price();
        let page = PageRequest::from_params(self.page.as_deref(), self.limit.as_deref());

        SectionFilter {
            search: self.search,
            category: CategoryFilter::from_param(self.category.as_deref()),
            price,
            ..SectionFilter::default()
        }
        .with_page(page)
    }

    fn price(&self) -> PriceFilter {
        if let Some(raw) = self.is_free.as_deref() {
            match parse_flag(raw) {
                Some(is_free) => return PriceFilter::IsFree(is_free),
                None => debug!(is_free = raw, "Ignoring unrecognized is_free value"),
            }
        }

        let Some(label) = self.price_filter.as_deref() else {
            return PriceFilter::Any;
        };
        match PriceBucket::parse_label(label) {
            Some(PriceBucket::All) => PriceFilter::Any,
            Some(bucket) => PriceFilter::Bucket(bucket),
            None => {
                debug!(price_filter = label, "Unrecognized price filter, not restricting price");
                PriceFilter::Any
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// `GET /sections`
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListSectionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Section>>> {
    let Query(query) = query.map_err(|e| bad_query(&e))?;
    let filter = query.into_filter();
    debug!(?filter, "Listing sections");

    let sections = state.store().list_sections(&filter).await?;
    Ok(Json(sections))
}

/// `GET /sections/{id}`
///
/// A malformed id cannot name a section, so it is a 404 like any other miss.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Section>> {
    let section = match SectionId::parse(&id) {
        Ok(id) => state.store().get_section(id).await?,
        Err(_) => None,
    };

    section
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Section not found".to_owned()))
}

/// `POST /sections`
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SectionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Section>)> {
    let Json(draft) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let new = draft
        .validate()
        .map_err(|e| AppError::invalid("Invalid section data", e))?;

    if !is_known_category(&new.category) {
        debug!(category = %new.category, "Creating section in an unlisted category");
    }

    let section = state.store().create_section(new).await?;
    tracing::info!(section_id = %section.id, name = %section.name, "Section created");

    Ok((StatusCode::CREATED, Json(section)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListSectionsQuery {
        let mut q = ListSectionsQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "category" => q.category = value,
                "search" => q.search = value,
                "price_filter" => q.price_filter = value,
                "is_free" => q.is_free = value,
                "page" => q.page = value,
                "limit" => q.limit = value,
                _ => {}
            }
        }
        q
    }

    #[test]
    fn test_defaults() {
        let filter = query(&[]).into_filter();
        assert_eq!(filter.price, PriceFilter::Any);
        assert_eq!(filter.category, CategoryFilter::Any);
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_page_translates_to_offset() {
        let filter = query(&[("page", "3"), ("limit", "5")]).into_filter();
        assert_eq!(filter.limit, Some(5));
        assert_eq!(filter.offset, 10);
    }

    #[test]
    fn test_bucket_label() {
        let filter = query(&[("price_filter", "$15 - $25")]).into_filter();
        assert_eq!(filter.price, PriceFilter::Bucket(PriceBucket::From15To25));

        let filter = query(&[("price_filter", "All Prices")]).into_filter();
        assert_eq!(filter.price, PriceFilter::Any);
    }

    #[test]
    fn test_unknown_label_fails_open() {
        let filter = query(&[("price_filter", "Cheap-ish")]).into_filter();
        assert_eq!(filter.price, PriceFilter::Any);
    }

    #[test]
    fn test_is_free_flag_wins_over_label() {
        let filter = query(&[("price_filter", "Over $25"), ("is_free", "false")]).into_filter();
        assert_eq!(filter.price, PriceFilter::IsFree(false));

        let filter = query(&[("price_filter", "Over $25"), ("is_free", "maybe")]).into_filter();
        assert_eq!(filter.price, PriceFilter::Bucket(PriceBucket::Over25));
    }

    #[test]
    fn test_category_sentinel() {
        let filter = query(&[("category", "All Categories")]).into_filter();
        assert_eq!(filter.category, CategoryFilter::Any);

        let filter = query(&[("category", "Testimonials")]).into_filter();
        assert_eq!(
            filter.category,
            CategoryFilter::Exact("Testimonials".to_owned())
        );
    }
}
