//! Metadata store trait and the JSON document implementation.

use crate::error::MetadataResult;
use async_trait::async_trait;
use souvenir_core::Store;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Load/save access to the whole places and photos document.
///
/// There is no locking: two callers that load, mutate and save concurrently
/// race, and the later save wins.
#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
    /// Read the full store. A missing or unreadable document yields an empty
    /// store rather than an error.
    async fn load(&self) -> MetadataResult<Store>;

    /// Replace the full store.
    async fn save(&self, store: &Store) -> MetadataResult<()>;

    /// Get the name of this backend, for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is usable before accepting requests.
    async fn health_check(&self) -> MetadataResult<()> {
        Ok(())
    }
}

/// Store kept as one pretty-printed JSON document on local disk.
///
/// A document that exists but cannot be decoded loads as an empty store. It
/// is copied to `<name>.corrupt-<unix-seconds>` before the next save
/// replaces it.
pub struct JsonFileStore {
    path: PathBuf,
    needs_backup: AtomicBool,
}

impl JsonFileStore {
    /// Open the document at `path`, creating its directory and an empty
    /// document if it does not exist yet.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let store = Self {
            path,
            needs_backup: AtomicBool::new(false),
        };
        if !fs::try_exists(&store.path).await? {
            tracing::info!(path = %store.path.display(), "Initializing empty places document");
            store.save(&Store::new()).await?;
        }

        Ok(store)
    }

    fn temp_path(&self) -> PathBuf {
        let temp_name = format!(".tmp.{}", Uuid::new_v4());
        self.path.with_file_name(
            self.path
                .file_name()
                .map(|n| format!("{}{}", n.to_string_lossy(), temp_name))
                .unwrap_or_else(|| temp_name.clone()),
        )
    }

    fn backup_path(&self) -> PathBuf {
        let suffix = format!(".corrupt-{}", OffsetDateTime::now_utc().unix_timestamp());
        let name = self
            .path
            .file_name()
            .map(|n| format!("{}{suffix}", n.to_string_lossy()))
            .unwrap_or(suffix);
        self.path.with_file_name(name)
    }

    /// Copy an undecodable document aside so the next save does not destroy it.
    async fn preserve_undecodable(&self) -> MetadataResult<()> {
        if !self.needs_backup.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let backup = self.backup_path();
        match fs::copy(&self.path, &backup).await {
            Ok(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "Kept a copy of the undecodable places document"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                self.needs_backup.store(true, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl MetadataStore for JsonFileStore {
    #[instrument(skip(self), fields(backend = "json"))]
    async fn load(&self) -> MetadataResult<Store> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Places document missing, using an empty store");
                return Ok(Store::new());
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read places document, using an empty store"
                );
                self.needs_backup.store(true, Ordering::SeqCst);
                return Ok(Store::new());
            }
        };

        match serde_json::from_slice::<Store>(&bytes) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Places document is not valid, using an empty store"
                );
                self.needs_backup.store(true, Ordering::SeqCst);
                Ok(Store::new())
            }
        }
    }

    #[instrument(
        skip(self, store),
        fields(backend = "json", places = store.places.len(), photos = store.photos.len())
    )]
    async fn save(&self, store: &Store) -> MetadataResult<()> {
        let data = serde_json::to_vec_pretty(store)?;
        self.preserve_undecodable().await?;

        // Write a sibling temp file, fsync, then rename over the document
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn health_check(&self) -> MetadataResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let meta = fs::metadata(&dir).await?;
        if !meta.is_dir() {
            return Err(crate::MetadataError::Config(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souvenir_core::NewPlace;
    use tempfile::tempdir;
    use time::OffsetDateTime;

    fn sample_place() -> NewPlace {
        NewPlace {
            name: Some("Annecy".to_string()),
            address: Some("Lac d'Annecy".to_string()),
            latitude: Some(45.8992),
            longitude: Some(6.1294),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_initializes_missing_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data").join("places.json");

        let store = JsonFileStore::new(&path).await.unwrap();

        assert!(path.exists());
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["nextPlaceId"], 1);
        assert_eq!(raw["nextPhotoId"], 1);
        assert_eq!(store.load().await.unwrap(), Store::new());
    }

    #[tokio::test]
    async fn test_new_keeps_existing_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        std::fs::write(
            &path,
            r#"{"places": [], "photos": [], "nextPlaceId": 12, "nextPhotoId": 30}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.next_place_id, 12);
        assert_eq!(loaded.next_photo_id, 30);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let store = JsonFileStore::new(temp.path().join("places.json"))
            .await
            .unwrap();

        let mut data = store.load().await.unwrap();
        let created = data
            .create_place(sample_place(), OffsetDateTime::now_utc())
            .unwrap();
        data.add_photo(created.place.id, "1-2.jpg", "lake.jpg", OffsetDateTime::now_utc())
            .unwrap();
        store.save(&data).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.places.len(), 1);
        assert_eq!(reloaded.places[0].name, "Annecy");
        assert_eq!(reloaded.photos[0].original_name, "lake.jpg");
        assert_eq!(reloaded.next_place_id, 2);
        assert_eq!(reloaded.next_photo_id, 2);
    }

    #[tokio::test]
    async fn test_save_writes_pretty_camel_case_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        let store = JsonFileStore::new(&path).await.unwrap();
        store.save(&Store::new()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"nextPlaceId\": 1"), "{text}");

        // No temp files left behind
        let entries: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_loads_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Store::new());
    }

    fn backups(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".corrupt-"))
            .collect()
    }

    #[tokio::test]
    async fn test_corrupt_document_is_kept_before_overwrite() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path).await.unwrap();

        let mut data = store.load().await.unwrap();
        assert!(backups(temp.path()).is_empty());

        data.create_place(sample_place(), OffsetDateTime::now_utc())
            .unwrap();
        store.save(&data).await.unwrap();

        let kept = backups(temp.path());
        assert_eq!(kept.len(), 1);
        assert!(
            kept[0]
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("places.json.corrupt-")
        );
        assert_eq!(std::fs::read_to_string(&kept[0]).unwrap(), "{ not json");
        assert_eq!(store.load().await.unwrap().places.len(), 1);

        // Only the first save after a failed load copies the document
        store.save(&data).await.unwrap();
        assert_eq!(backups(temp.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_valid_document_is_not_copied() {
        let temp = tempdir().unwrap();
        let store = JsonFileStore::new(temp.path().join("places.json"))
            .await
            .unwrap();

        let data = store.load().await.unwrap();
        store.save(&data).await.unwrap();

        assert!(backups(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_loosely_typed_document_keeps_places_and_counters() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        std::fs::write(
            &path,
            r#"{
  "places": [
    {"id": 1, "name": "Annecy", "address": "Lac", "latitude": "48.2",
     "longitude": 6.1, "sort_order": "", "created_at": "2024-02-14T10:00:00.000Z"},
    {"id": 2, "name": "Lyon", "address": "Bellecour", "latitude": 45.7,
     "longitude": "4.8", "sort_order": 1.5, "created_at": "2024-02-14T10:00:00.000Z"}
  ],
  "photos": [],
  "nextPlaceId": 3,
  "nextPhotoId": 1
}"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path).await.unwrap();

        let mut data = store.load().await.unwrap();
        assert_eq!(data.places.len(), 2);
        assert_eq!(data.places[0].latitude, 48.2);
        assert_eq!(data.places[1].sort_order, 1);

        let created = data
            .create_place(sample_place(), OffsetDateTime::now_utc())
            .unwrap();
        assert_eq!(created.place.id.get(), 3);
        store.save(&data).await.unwrap();

        assert_eq!(store.load().await.unwrap().places.len(), 3);
        assert!(backups(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_deleted_document_loads_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        let store = JsonFileStore::new(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(store.load().await.unwrap(), Store::new());
    }

    #[tokio::test]
    async fn test_loads_document_written_by_earlier_versions() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        std::fs::write(
            &path,
            r#"{
  "places": [
    {
      "id": 1,
      "name": "Tour Eiffel",
      "address": "Champ de Mars, Paris",
      "description": "",
      "latitude": 48.8584,
      "longitude": 2.2945,
      "date_visited": "",
      "sort_order": 0,
      "created_at": "2024-02-14T10:00:00.000Z"
    }
  ],
  "photos": [
    {
      "id": 1,
      "place_id": 1,
      "filename": "1707904800000-123456789.jpg",
      "original_name": "eiffel.jpg",
      "created_at": "2024-02-14T10:05:00.000Z"
    }
  ],
  "nextPlaceId": 2,
  "nextPhotoId": 2
}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.places.len(), 1);
        assert_eq!(loaded.photos.len(), 1);
        assert_eq!(loaded.list_places()[0].photos.len(), 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp = tempdir().unwrap();
        let store = JsonFileStore::new(temp.path().join("places.json"))
            .await
            .unwrap();
        store.health_check().await.unwrap();
        assert_eq!(store.backend_name(), "json");
    }
}
