//! In-process backend for [`SectionStore`].
//!
//! All state sits behind one `RwLock`. Reads share it; every mutation,
//! including the whole install check-and-insert, holds the write half, which
//! gives the same atomicity the `PostgreSQL` backend gets from its unique key
//! and transaction.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use section_factory_core::{
    Installation, NewSection, Section, SectionFilter, SectionId, ShopDomain, User, UserId,
    Username,
};

use super::{InstallReceipt, RepositoryError, SectionStore};

#[derive(Debug, Default)]
struct Catalog {
    /// Insertion order; [`SectionFilter::apply`] relies on it for ties.
    sections: Vec<Section>,
    installations: Vec<Installation>,
    users: Vec<User>,
}

/// [`SectionStore`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn list_sections(&self, filter: &SectionFilter) -> Result<Vec<Section>, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(filter.apply(&catalog.sections))
    }

    async fn get_section(&self, id: SectionId) -> Result<Option<Section>, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.sections.iter().find(|s| s.id == id).cloned())
    }

    async fn create_section(&self, section: NewSection) -> Result<Section, RepositoryError> {
        let section = Section::from_new(
            NewSection {
                downloads: 0,
                rating: None,
                ..section
            },
            Utc::now(),
        );
        self.catalog.write().await.sections.push(section.clone());
        Ok(section)
    }

    async fn install(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<InstallReceipt, RepositoryError> {
        let mut catalog = self.catalog.write().await;
        let Catalog {
            sections,
            installations,
            ..
        } = &mut *catalog;

        let section = sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(RepositoryError::NotFound)?;

        if installations
            .iter()
            .any(|i| i.section_id == section_id && i.shop_domain == *shop)
        {
            return Err(RepositoryError::Conflict(
                "section already installed".to_owned(),
            ));
        }

        let snapshot = section.clone();
        section.downloads = section.downloads.saturating_add(1);

        let installation = Installation::new(section_id, shop.clone(), Utc::now());
        installations.push(installation.clone());

        Ok(InstallReceipt {
            installation,
            section: snapshot,
        })
    }

    async fn installations_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<Installation>, RepositoryError> {
        let catalog = self.catalog.read().await;
        let mut found: Vec<Installation> = catalog
            .installations
            .iter()
            .filter(|i| i.shop_domain == *shop)
            .cloned()
            .collect();
        found.sort_by_key(|i| i.installed_at);
        Ok(found)
    }

    async fn is_installed(
        &self,
        section_id: SectionId,
        shop: &ShopDomain,
    ) -> Result<bool, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .installations
            .iter()
            .any(|i| i.section_id == section_id && i.shop_domain == *shop))
    }

    async fn reseed(&self, sections: Vec<NewSection>) -> Result<usize, RepositoryError> {
        // One timestamp for the batch, as a single transaction would give.
        let now = Utc::now();
        let mut catalog = self.catalog.write().await;
        catalog.installations.clear();
        catalog.sections = sections
            .into_iter()
            .map(|s| Section::from_new(s, now))
            .collect();
        Ok(catalog.sections.len())
    }

    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .users
            .iter()
            .find(|u| u.username == *username)
            .cloned())
    }

    async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut catalog = self.catalog.write().await;
        if catalog.users.iter().any(|u| u.username == *username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }
        let user = User {
            id: UserId::generate(),
            username: username.clone(),
            password_hash: password_hash.to_owned(),
        };
        catalog.users.push(user.clone());
        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
