//! Installation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{InstallationId, SectionId};
use super::shop_domain::ShopDomain;

/// A record that a shop has added a section to its theme.
///
/// At most one installation exists per (section, shop) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: InstallationId,
    pub section_id: SectionId,
    pub shop_domain: ShopDomain,
    pub installed_at: DateTime<Utc>,
}

impl Installation {
    /// Create a new installation record stamped with `installed_at`.
    #[must_use]
    pub fn new(section_id: SectionId, shop_domain: ShopDomain, installed_at: DateTime<Utc>) -> Self {
        Self {
            id: InstallationId::generate(),
            section_id,
            shop_domain,
            installed_at,
        }
    }
}
