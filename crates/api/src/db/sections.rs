//! Section repository for database operations.
//!
//! Queries are built at runtime: the list query is assembled with
//! [`sqlx::QueryBuilder`] from a [`SectionFilter`] so that every optional
//! dimension binds its own parameter.
//!
//! Only the generated SQL text is unit tested here; nothing in this
//! workspace runs these queries against a live `PostgreSQL`.
//!
//! Search folds case with `lower()`, which follows the database collation.
//! [`MemoryStore`](super::MemoryStore) uses Unicode `to_lowercase`, so the two
//! backends agree on ASCII terms but may disagree on some non-ASCII ones.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use section_factory_core::{
    CategoryFilter, NewSection, Price, PriceFilter, Rating, Section, SectionFilter, SectionId,
};

use super::RepositoryError;

/// Column list shared by every query that returns a [`Section`].
pub(crate) const SECTION_COLUMNS: &str = "id, name, description, category, price, is_free, \
     preview_image, liquid_code, settings_schema, is_popular, downloads, rating, created_at";

/// Raw `sections` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SectionRow {
    id: SectionId,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    is_free: bool,
    preview_image: String,
    liquid_code: String,
    settings_schema: Option<String>,
    is_popular: bool,
    downloads: i32,
    rating: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SectionRow> for Section {
    type Error = RepositoryError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for section {}: {e}", row.id))
        })?;
        let downloads = u32::try_from(row.downloads).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative download count for section {}",
                row.id
            ))
        })?;
        let rating = row
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid rating for section {}: {e}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            price,
            is_free: row.is_free,
            preview_image: row.preview_image,
            liquid_code: row.liquid_code,
            settings_schema: row.settings_schema,
            is_popular: row.is_popular,
            downloads,
            rating,
            created_at: row.created_at,
        })
    }
}

/// Render a filter as a single parameterised `SELECT`.
///
/// Search uses `strpos` over lowercased text so the term is matched
/// literally; `%` and `_` carry no special meaning.
#[must_use]
pub fn list_query(filter: &SectionFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SECTION_COLUMNS} FROM sections WHERE TRUE"));

    if let Some(term) = filter.search_term() {
        qb.push(" AND (strpos(lower(name), lower(")
            .push_bind(term.to_owned())
            .push(")) > 0 OR strpos(lower(description), lower(")
            .push_bind(term.to_owned())
            .push(")) > 0)");
    }

    if let CategoryFilter::Exact(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }

    match filter.price {
        PriceFilter::Any => {}
        PriceFilter::IsFree(is_free) => {
            qb.push(" AND is_free = ").push_bind(is_free);
        }
        PriceFilter::Bucket(bucket) => {
            if let Some(is_free) = bucket.required_is_free() {
                qb.push(" AND is_free = ").push_bind(is_free);
            }
            // Bounds only apply to paid sections.
            let (min, max) = bucket.price_bounds();
            if let Some(min) = min {
                qb.push(" AND (is_free OR price >= ").push_bind(min).push(")");
            }
            if let Some(max) = max {
                qb.push(" AND (is_free OR price <= ").push_bind(max).push(")");
            }
        }
    }

    qb.push(" ORDER BY created_at ASC, seq ASC");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if filter.offset > 0 {
        qb.push(" OFFSET ")
            .push_bind(i64::try_from(filter.offset).unwrap_or(i64::MAX));
    }

    qb
}

/// Repository for section database operations.
pub struct SectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SectionRepository<'a> {
    /// Create a new section repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List sections matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, filter: &SectionFilter) -> Result<Vec<Section>, RepositoryError> {
        let mut qb = list_query(filter);
        let rows = qb
            .build_query_as::<SectionRow>()
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Section::try_from).collect()
    }

    /// Get a section by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: SectionId) -> Result<Option<Section>, RepositoryError> {
        let row = sqlx::query_as::<_, SectionRow>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Section::try_from).transpose()
    }

    /// Insert a new section.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, section: &NewSection) -> Result<Section, RepositoryError> {
        let row = insert(section).fetch_one(self.pool).await?;

        Section::try_from(row)
    }

    /// Replace the catalog in one transaction.
    ///
    /// Installations go first since they reference sections.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// changed in that case.
    pub async fn replace_all(&self, sections: &[NewSection]) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed_installs = sqlx::query("DELETE FROM installations")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let removed_sections = sqlx::query("DELETE FROM sections")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::debug!(removed_installs, removed_sections, "Cleared catalog");

        for section in sections {
            insert(section).fetch_one(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(sections.len())
    }
}

/// `INSERT ... RETURNING` for one section, honouring its download count and
/// rating.
fn insert(
    section: &NewSection,
) -> sqlx::query::QueryAs<'_, Postgres, SectionRow, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, SectionRow>(
        "INSERT INTO sections (name, description, category, price, is_free, preview_image, \
         liquid_code, settings_schema, is_popular, downloads, rating) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id, name, description, category, price, is_free, preview_image, \
         liquid_code, settings_schema, is_popular, downloads, rating, created_at",
    )
    .bind(&section.name)
    .bind(&section.description)
    .bind(&section.category)
    .bind(section.price.amount())
    .bind(section.is_free)
    .bind(&section.preview_image)
    .bind(&section.liquid_code)
    .bind(section.settings_schema.as_deref())
    .bind(section.is_popular)
    .bind(i32::try_from(section.downloads).unwrap_or(i32::MAX))
    .bind(section.rating.map(|r| r.value()))
}

#[cfg(test)]
mod tests {
    use section_factory_core::{PageRequest, PriceBucket};

    use super::*;

    #[test]
    fn test_unfiltered_query_has_no_predicates() {
        let qb = list_query(&SectionFilter::default());
        assert_eq!(
            qb.sql(),
            format!(
                "SELECT {SECTION_COLUMNS} FROM sections WHERE TRUE ORDER BY created_at ASC, seq ASC"
            )
        );
    }

    #[test]
    fn test_search_binds_term_twice() {
        let qb = list_query(&SectionFilter::default().with_search("hero"));
        let sql = qb.sql();
        assert!(sql.contains("strpos(lower(name), lower($1)) > 0"));
        assert!(sql.contains("strpos(lower(description), lower($2)) > 0"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let qb = list_query(&SectionFilter::default().with_search("   "));
        assert!(!qb.sql().contains("strpos"));
    }

    #[test]
    fn test_category_sentinel_adds_nothing() {
        let qb = list_query(&SectionFilter::default().with_category("All Categories"));
        assert!(!qb.sql().contains("category ="));

        let qb = list_query(&SectionFilter::default().with_category("FAQ Sections"));
        assert!(qb.sql().contains("AND category = $1"));
    }

    #[test]
    fn test_bucket_renders_flag_and_bounds() {
        let qb = list_query(
            &SectionFilter::default().with_price(PriceFilter::Bucket(PriceBucket::From5To15)),
        );
        let sql = qb.sql();
        assert!(sql.contains("AND is_free = $1"));
        assert!(sql.contains("AND (is_free OR price >= $2)"));
        assert!(sql.contains("AND (is_free OR price <= $3)"));
    }

    #[test]
    fn test_free_only_has_no_bounds() {
        let qb = list_query(
            &SectionFilter::default().with_price(PriceFilter::Bucket(PriceBucket::FreeOnly)),
        );
        assert!(qb.sql().contains("AND is_free = $1"));
        assert!(!qb.sql().contains("price >="));
        assert!(!qb.sql().contains("price <="));
    }

    #[test]
    fn test_direct_flag_ignores_bounds() {
        let qb = list_query(&SectionFilter::default().with_price(PriceFilter::IsFree(false)));
        assert!(qb.sql().contains("AND is_free = $1"));
        assert!(!qb.sql().contains("price >="));
    }

    #[test]
    fn test_page_renders_limit_and_offset() {
        let page = PageRequest { page: 3, limit: 10 };
        let qb = list_query(&SectionFilter::default().with_page(page));
        assert!(qb.sql().ends_with(" LIMIT $1 OFFSET $2"));

        let qb = list_query(&SectionFilter::default().with_page(PageRequest::default()));
        assert!(qb.sql().ends_with(" LIMIT $1"));
    }

    #[test]
    fn test_all_dimensions_number_sequentially() {
        let filter = SectionFilter::default()
            .with_search("grid")
            .with_category("Product Features")
            .with_price(PriceFilter::Bucket(PriceBucket::Over25))
            .with_window(4, Some(2));
        let qb = list_query(&filter);
        let sql = qb.sql();
        assert!(sql.contains("category = $3"));
        assert!(sql.contains("is_free = $4"));
        assert!(sql.contains("price >= $5"));
        assert!(sql.ends_with("LIMIT $6 OFFSET $7"));
    }
}
