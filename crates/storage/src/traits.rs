//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Flat object store holding uploaded photo files, keyed by stored file name.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Get an object's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object atomically, replacing any previous content.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete an object. Fails with `NotFound` when it does not exist.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List the keys of all stored objects.
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Get the name of this storage backend.
    ///
    /// Returns a static string identifier for the backend type (e.g., "filesystem").
    /// Used for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify storage backend availability.
    ///
    /// The default implementation returns Ok(()), suitable for backends that
    /// need no verification.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Convenience operations built on [`ObjectStore`].
///
/// Automatically implemented for every `ObjectStore`; do not implement it manually.
#[async_trait]
pub trait ObjectStoreExt: ObjectStore {
    /// Delete an object, treating a missing object as already deleted.
    ///
    /// Returns whether an object was actually removed.
    async fn delete_if_exists(&self, key: &str) -> StorageResult<bool> {
        match self.delete(key).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<T: ObjectStore + ?Sized> ObjectStoreExt for T {}
