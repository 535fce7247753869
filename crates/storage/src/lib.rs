//! Photo file storage abstraction and backends for Souvenir.
//!
//! This crate provides:
//! - A flat object store keyed by stored file name, with atomic writes
//! - Best-effort deletion that tolerates already-missing files
//! - Backends: local filesystem and in-memory

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{filesystem::FilesystemBackend, memory::MemoryBackend};
pub use error::{StorageError, StorageResult};
pub use traits::{ObjectStore, ObjectStoreExt};

use souvenir_core::config::StorageConfig;
use std::sync::Arc;

/// Create an object store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory photo storage, uploads will be lost on restart");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
