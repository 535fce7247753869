//! Persistence of the places and photos document for Souvenir.
//!
//! This crate provides:
//! - The `MetadataStore` load/save abstraction over the whole `Store`
//! - A JSON document backend on local disk
//! - An in-memory backend for tests and throwaway instances

pub mod error;
pub mod memory;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use memory::MemoryStore;
pub use store::{JsonFileStore, MetadataStore};

use souvenir_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Json { path } => {
            let store = JsonFileStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
        MetadataConfig::Memory => {
            tracing::warn!("Using in-memory metadata store, places will be lost on restart");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn MetadataStore>)
        }
    }
}
