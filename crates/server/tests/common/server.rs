//! Server test utilities.

use souvenir_core::config::{AppConfig, MetadataConfig, ServerConfig, StorageConfig};
use souvenir_metadata::{JsonFileStore, MetadataStore};
use souvenir_server::{AppState, create_router};
use souvenir_storage::{FilesystemBackend, ObjectStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Contents of the admin page written into the test public directory.
pub const ADMIN_HTML: &str = "<html><body>admin</body></html>";

/// Contents of the public index page.
pub const INDEX_HTML: &str = "<html><body>map</body></html>";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server backed by a temporary directory.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let public_dir = temp_dir.path().join("public");
        std::fs::create_dir_all(&public_dir).expect("Failed to create public directory");
        std::fs::write(public_dir.join("admin.html"), ADMIN_HTML).expect("write admin page");
        std::fs::write(public_dir.join("index.html"), INDEX_HTML).expect("write index page");

        let uploads_path = temp_dir.path().join("uploads");
        let document_path = temp_dir.path().join("data").join("places.json");

        let mut config = AppConfig {
            server: ServerConfig {
                public_dir,
                ..Default::default()
            },
            metadata: MetadataConfig::Json {
                path: document_path.clone(),
            },
            storage: StorageConfig::Filesystem {
                path: uploads_path.clone(),
            },
            upload: Default::default(),
        };

        modifier(&mut config);

        let storage: Arc<dyn ObjectStore> = Arc::new(
            FilesystemBackend::new(&uploads_path)
                .await
                .expect("Failed to create storage backend"),
        );
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            JsonFileStore::new(&document_path)
                .await
                .expect("Failed to create metadata store"),
        );

        let state = AppState::new(config, storage, metadata);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Directory holding stored photo files.
    pub fn uploads_dir(&self) -> PathBuf {
        self._temp_dir.path().join("uploads")
    }

    /// Path of the persisted JSON document.
    pub fn document_path(&self) -> PathBuf {
        self._temp_dir.path().join("data").join("places.json")
    }

    /// Whether a stored photo file exists on disk.
    pub fn upload_exists(&self, filename: &str) -> bool {
        self.uploads_dir().join(filename).exists()
    }

    /// Stored photo files currently on disk.
    pub async fn stored_files(&self) -> Vec<String> {
        self.state.storage.list().await.expect("list uploads")
    }

    /// Raw persisted document.
    pub fn document(&self) -> serde_json::Value {
        let bytes = std::fs::read(self.document_path()).expect("read document");
        serde_json::from_slice(&bytes).expect("parse document")
    }
}
