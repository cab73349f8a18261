//! `PostgreSQL` backend for [`SectionStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use section_factory_core::{
    Installation, NewSection, Section, SectionFilter, SectionId, ShopDomain, User,
    Username,
};

use super::installations::InstallationRepository;
use super::sections::SectionRepository;
use super::users::UserRepository;
use super::{InstallReceipt, RepositoryError, SectionStore};

/// [`SectionStore`] backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SectionStore for PgStore {
    async fn list_sections(&self, filter: &SectionFilter) -> Result<Vec<Section>, RepositoryError> {
        SectionRepository::new(&self.pool).list(filter).await
    }

    async fn get_section(&self, id: SectionId) -> Result<Option<Section>, RepositoryError> {
        SectionRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_section(&self, section: NewSection) -> Result<Section, RepositoryError> {
        let section = NewSection {
            downloads: 0,
            rating: None,
            ..section
        };
        SectionRepository::new(&self.pool).create(&section).await
    }

    async fn install(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<InstallReceipt, RepositoryError> {
        InstallationRepository::new(&self.pool)
            .install(section_id, shop)
            .await
    }

    async fn installations_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<Installation>, RepositoryError> {
        InstallationRepository::new(&self.pool)
            .list_for_shop(shop)
            .await
    }

    async fn is_installed(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<bool, RepositoryError> {
        InstallationRepository::new(&self.pool)
            .exists(section_id, shop)
            .await
    }

    async fn reseed(&self, sections: Vec<NewSection>) -> Result<usize, RepositoryError> {
        SectionRepository::new(&self.pool)
            .replace_all(&sections)
            .await
    }

    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        UserRepository::new(&self.pool)
            .get_by_username(username)
            .await
    }

    async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        UserRepository::new(&self.pool)
            .create(username, password_hash)
            .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
