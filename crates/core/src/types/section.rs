//! Section records and creation payloads.
//!
//! A [`Section`] is an installable storefront template unit. New sections
//! arrive as a loosely typed [`SectionDraft`] (request body or seed file) and
//! are checked field by field into a [`NewSection`], so callers get every
//! problem at once instead of the first one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::SectionId;
use super::price::{Price, Rating};
use super::validation::{FieldError, ValidationError};

/// A section as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    /// Free sections skip price-range classification entirely.
    pub is_free: bool,
    pub preview_image: String,
    /// Shopify Liquid source for the section, including its `{% schema %}`.
    pub liquid_code: String,
    pub settings_schema: Option<String>,
    pub is_popular: bool,
    /// Successful installs; only ever incremented.
    pub downloads: u32,
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
}

impl Section {
    /// Materialize a validated [`NewSection`] with a fresh id.
    #[must_use]
    pub fn from_new(new: NewSection, created_at: DateTime<Utc>) -> Self {
        Self {
            id: SectionId::generate(),
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            is_free: new.is_free,
            preview_image: new.preview_image,
            liquid_code: new.liquid_code,
            settings_schema: new.settings_schema,
            is_popular: new.is_popular,
            downloads: new.downloads,
            rating: new.rating,
            created_at,
        }
    }
}

/// Unvalidated section input.
///
/// Every field is optional so that missing values surface as field errors
/// from [`SectionDraft::validate`] rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub is_free: Option<bool>,
    pub preview_image: Option<String>,
    pub liquid_code: Option<String>,
    pub settings_schema: Option<String>,
    pub is_popular: Option<bool>,
    /// Only honoured by [`SectionDraft::validate_seed`].
    pub downloads: Option<i64>,
    /// Only honoured by [`SectionDraft::validate_seed`].
    pub rating: Option<Decimal>,
}

/// A validated section ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSection {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub is_free: bool,
    pub preview_image: String,
    pub liquid_code: String,
    pub settings_schema: Option<String>,
    pub is_popular: bool,
    pub downloads: u32,
    pub rating: Option<Rating>,
}

impl SectionDraft {
    /// Validate a section submitted through the creation endpoint.
    ///
    /// `downloads` and `rating` are not client-settable here: new sections
    /// start with zero downloads and no rating.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(self) -> Result<NewSection, ValidationError> {
        let mut errors = Vec::new();
        let section = self.validate_common(&mut errors);
        finish(section, errors)
    }

    /// Validate a section loaded from seed data, keeping its download count
    /// and rating.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate_seed(self) -> Result<NewSection, ValidationError> {
        let mut errors = Vec::new();
        let downloads = match self.downloads.map(u32::try_from) {
            None => Some(0),
            Some(Ok(n)) => Some(n),
            Some(Err(_)) => {
                errors.push(FieldError::new(
                    "downloads",
                    "must be a non-negative integer",
                ));
                None
            }
        };
        let rating = match self.rating.map(Rating::new) {
            None => Some(None),
            Some(Ok(r)) => Some(Some(r)),
            Some(Err(e)) => {
                errors.push(FieldError::new("rating", e.to_string()));
                None
            }
        };

        let section = self.validate_common(&mut errors);
        finish(section, errors).map(|mut section| {
            // Both are Some whenever `errors` was empty.
            section.downloads = downloads.unwrap_or_default();
            section.rating = rating.flatten();
            section
        })
    }

    fn validate_common(self, errors: &mut Vec<FieldError>) -> Option<NewSection> {
        let name = required(self.name, "name", errors);
        let description = required(self.description, "description", errors);
        let category = required(self.category, "category", errors);
        let liquid_code = required(self.liquid_code, "liquidCode", errors);
        let preview_image = required(self.preview_image, "previewImage", errors).and_then(|uri| {
            if looks_like_uri(&uri) {
                Some(uri)
            } else {
                errors.push(FieldError::new(
                    "previewImage",
                    "must be an http(s) URL or an absolute path",
                ));
                None
            }
        });

        let is_free = self.is_free.unwrap_or(false);
        let price = match self.price.map(Price::new) {
            None => {
                errors.push(FieldError::new("price", "is required"));
                None
            }
            Some(Err(e)) => {
                errors.push(FieldError::new("price", e.to_string()));
                None
            }
            Some(Ok(price)) if is_free && !price.is_zero() => {
                errors.push(FieldError::new("price", "must be 0 when isFree is true"));
                None
            }
            Some(Ok(price)) => Some(price),
        };

        let settings_schema = self.settings_schema.filter(|s| !s.trim().is_empty());

        Some(NewSection {
            name: name?,
            description: description?,
            category: category?,
            price: price?,
            is_free,
            preview_image: preview_image?,
            liquid_code: liquid_code?,
            settings_schema,
            is_popular: self.is_popular.unwrap_or(false),
            downloads: 0,
            rating: None,
        })
    }
}

fn finish(
    section: Option<NewSection>,
    errors: Vec<FieldError>,
) -> Result<NewSection, ValidationError> {
    match section {
        Some(section) if errors.is_empty() => Ok(section),
        _ => Err(ValidationError::new(errors)),
    }
}

fn required(value: Option<String>, field: &'static str, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_owned()),
        Some(_) => {
            errors.push(FieldError::new(field, "must not be blank"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

fn looks_like_uri(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://") || value.starts_with('/')
}
