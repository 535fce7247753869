//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory of static front-end assets served as the fallback route.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Unlisted path of the admin page. Not an access control mechanism.
    #[serde(default = "default_admin_path")]
    pub admin_path: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_admin_path() -> String {
    "/notre-secret-admin".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_dir: default_public_dir(),
            admin_path: default_admin_path(),
        }
    }
}

impl ServerConfig {
    /// File served at the admin path.
    pub fn admin_page(&self) -> PathBuf {
        self.public_dir.join("admin.html")
    }
}

/// Metadata (places and photos document) backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// Single JSON document on local disk.
    Json {
        /// Path of the document.
        path: PathBuf,
    },
    /// Process-local store, lost on restart.
    Memory,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Json {
            path: PathBuf::from("data/places.json"),
        }
    }
}

/// Photo file storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Flat directory on local disk.
    Filesystem {
        /// Directory holding the uploaded images.
        path: PathBuf,
    },
    /// Process-local storage, lost on restart.
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("uploads"),
        }
    }
}

/// Photo upload limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of one file in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Maximum number of accepted files per request.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_max_file_size() -> u64 {
    crate::DEFAULT_MAX_FILE_SIZE
}

fn default_max_files() -> usize {
    crate::DEFAULT_MAX_FILES
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
        }
    }
}

impl UploadConfig {
    /// Request body limit for the upload route: every file at its maximum
    /// size plus room for multipart headers and boundaries.
    pub fn body_limit(&self) -> usize {
        const MULTIPART_OVERHEAD: u64 = 64 * 1024;
        let files = u64::try_from(self.max_files).unwrap_or(u64::MAX);
        let total = files
            .saturating_mul(self.max_file_size)
            .saturating_add(MULTIPART_OVERHEAD);
        usize::try_from(total).unwrap_or(usize::MAX)
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Places and photos document backend.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Photo file storage backend.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Create a test configuration with in-memory backends.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::Memory,
            storage: StorageConfig::Memory,
            upload: UploadConfig::default(),
        }
    }

    /// Reject settings the router cannot honour.
    pub fn validate(&self) -> crate::Result<()> {
        let admin_path = self.server.admin_path.as_str();
        if !admin_path.starts_with('/') || admin_path.len() < 2 {
            return Err(crate::Error::Config(format!(
                "server.admin_path must start with '/' and name a page: {admin_path:?}"
            )));
        }
        // Must stay a literal route
        if admin_path.contains(['{', '}', '*']) || admin_path.contains("/:") {
            return Err(crate::Error::Config(format!(
                "server.admin_path must be a literal path: {admin_path:?}"
            )));
        }
        for reserved in ["/api", "/uploads"] {
            if admin_path == reserved || admin_path.starts_with(&format!("{reserved}/")) {
                return Err(crate::Error::Config(format!(
                    "server.admin_path must not live under {reserved}: {admin_path:?}"
                )));
            }
        }
        if self.upload.max_files == 0 {
            return Err(crate::Error::Config(
                "upload.max_files must be greater than zero".to_string(),
            ));
        }
        if self.upload.max_file_size == 0 {
            return Err(crate::Error::Config(
                "upload.max_file_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
