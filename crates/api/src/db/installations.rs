//! Installation repository for database operations.
//!
//! These queries have no database-backed tests; the install semantics are
//! exercised through [`MemoryStore`](super::MemoryStore).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use section_factory_core::{Installation, InstallationId, Section, SectionId, ShopDomain};

use super::sections::{SECTION_COLUMNS, SectionRow};
use super::{InstallReceipt, RepositoryError};

/// Raw `installations` row.
#[derive(Debug, sqlx::FromRow)]
struct InstallationRow {
    id: InstallationId,
    section_id: SectionId,
    shop_domain: String,
    installed_at: DateTime<Utc>,
}

impl TryFrom<InstallationRow> for Installation {
    type Error = RepositoryError;

    fn try_from(row: InstallationRow) -> Result<Self, Self::Error> {
        let shop_domain = ShopDomain::parse(&row.shop_domain).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid shop domain in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            section_id: row.section_id,
            shop_domain,
            installed_at: row.installed_at,
        })
    }
}

/// Repository for installation database operations.
pub struct InstallationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InstallationRepository<'a> {
    /// Create a new installation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an install and increment the section's download count.
    ///
    /// The insert is conditional on the `(section_id, shop_domain)` unique
    /// key, and the increment runs in the same transaction, so concurrent
    /// duplicates resolve to exactly one installation and one increment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the section does not exist.
    /// Returns `RepositoryError::Conflict` if the shop already installed it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn install(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<InstallReceipt, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let section = sqlx::query_as::<_, SectionRow>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1"
        ))
        .bind(section_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        let section = Section::try_from(section)?;

        let inserted = sqlx::query_as::<_, InstallationRow>(
            r"
            INSERT INTO installations (section_id, shop_domain)
            VALUES ($1, $2)
            ON CONFLICT (section_id, shop_domain) DO NOTHING
            RETURNING id, section_id, shop_domain, installed_at
            ",
        )
        .bind(section_id)
        .bind(shop.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            // The section was deleted between the read and the insert.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        // Dropping `tx` rolls back; nothing was written.
        let Some(row) = inserted else {
            return Err(RepositoryError::Conflict(
                "section already installed".to_owned(),
            ));
        };
        let installation = Installation::try_from(row)?;

        sqlx::query("UPDATE sections SET downloads = downloads + 1 WHERE id = $1")
            .bind(section_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(InstallReceipt {
            installation,
            section,
        })
    }

    /// List a shop's installations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<Installation>, RepositoryError> {
        let rows = sqlx::query_as::<_, InstallationRow>(
            r"
            SELECT id, section_id, shop_domain, installed_at
            FROM installations
            WHERE shop_domain = $1
            ORDER BY installed_at ASC, id ASC
            ",
        )
        .bind(shop.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Installation::try_from).collect()
    }

    /// Whether the shop has installed the section.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<bool, RepositoryError> {
        let installed = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM installations
                WHERE section_id = $1 AND shop_domain = $2
            )
            ",
        )
        .bind(section_id)
        .bind(shop.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(installed)
    }
}
