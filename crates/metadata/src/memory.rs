//! In-process metadata store.

use crate::error::MetadataResult;
use crate::store::MetadataStore;
use async_trait::async_trait;
use souvenir_core::Store;
use tokio::sync::RwLock;

/// Store held in memory and lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    store: RwLock<Store>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing data.
    pub fn with_store(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn load(&self) -> MetadataResult<Store> {
        Ok(self.store.read().await.clone())
    }

    async fn save(&self, store: &Store) -> MetadataResult<()> {
        *self.store.write().await = store.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
