//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::SectionStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The storage handle is built once at start-up
/// and injected here; handlers never reach for a global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn SectionStore>,
}

impl AppState {
    /// Create a new application state around a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn SectionStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the section store.
    #[must_use]
    pub fn store(&self) -> &dyn SectionStore {
        self.inner.store.as_ref()
    }
}
