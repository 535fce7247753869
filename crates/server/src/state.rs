//! Application state shared across handlers.

use souvenir_core::config::AppConfig;
use souvenir_metadata::MetadataStore;
use souvenir_storage::ObjectStore;
use std::sync::Arc;

/// Shared application state.
///
/// Holds no records: every request loads the store from `metadata` and saves
/// it back when it mutates anything. Concurrent writers race, and the last
/// save wins.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Photo file storage.
    pub storage: Arc<dyn ObjectStore>,
    /// Places and photos document.
    pub metadata: Arc<dyn MetadataStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metadata,
        }
    }
}
