//! Multipart photo intake.
//!
//! Files from the `photos` field are filtered against the image allow-list,
//! size-checked while streaming, and written to storage under generated
//! names. A batch that fails part-way removes what it already wrote.

use crate::error::{ApiError, ApiResult};
use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use souvenir_core::config::UploadConfig;
use souvenir_core::image::{generate_filename, is_accepted};
use souvenir_storage::{ObjectStore, ObjectStoreExt};
use tracing::{debug, warn};

/// Multipart field carrying the photo files.
pub const PHOTOS_FIELD: &str = "photos";

/// A file written to storage by the current request.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated name in storage.
    pub filename: String,
    /// Name the client sent.
    pub original_name: String,
    /// Size in bytes.
    pub size: usize,
}

/// Files accepted from one upload request.
pub struct UploadBatch<'a> {
    storage: &'a dyn ObjectStore,
    limits: &'a UploadConfig,
    stored: Vec<StoredFile>,
    skipped: usize,
}

impl<'a> UploadBatch<'a> {
    pub fn new(storage: &'a dyn ObjectStore, limits: &'a UploadConfig) -> Self {
        Self {
            storage,
            limits,
            stored: Vec::new(),
            skipped: 0,
        }
    }

    /// Files stored so far.
    pub fn files(&self) -> &[StoredFile] {
        &self.stored
    }

    /// Combined size of the stored files in bytes.
    pub fn total_size(&self) -> usize {
        self.stored.iter().map(|f| f.size).sum()
    }

    /// Number of files dropped by the allow-list.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consume every field of the request.
    ///
    /// Rejected files are skipped silently. On error the caller must
    /// [`discard`](Self::discard) the batch.
    pub async fn receive(&mut self, multipart: &mut Multipart) -> ApiResult<()> {
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(PHOTOS_FIELD) {
                debug!(field = ?field.name(), "Ignoring unexpected multipart field");
                continue;
            }

            let original_name = field.file_name().unwrap_or_default().to_string();
            if !is_accepted(&original_name, field.content_type()) {
                debug!(
                    original_name = %original_name,
                    content_type = ?field.content_type(),
                    "Skipping file that is not an allowed image"
                );
                self.skipped += 1;
                continue;
            }

            if self.stored.len() >= self.limits.max_files {
                return Err(ApiError::BadRequest(format!(
                    "too many files: at most {} photos per upload",
                    self.limits.max_files
                )));
            }

            let data = read_limited(field, self.limits.max_file_size).await?;
            let size = data.len();
            let filename = generate_filename(&original_name);
            self.storage.put(&filename, data).await?;

            debug!(filename = %filename, original_name = %original_name, size, "Photo file stored");
            self.stored.push(StoredFile {
                filename,
                original_name,
                size,
            });
        }
        Ok(())
    }

    /// Delete every file this batch wrote.
    pub async fn discard(self) {
        for file in &self.stored {
            if let Err(e) = self.storage.delete_if_exists(&file.filename).await {
                warn!(filename = %file.filename, error = %e, "Failed to remove file of failed upload");
            }
        }
    }
}

/// Read a field, failing as soon as it exceeds `limit` bytes.
async fn read_limited(mut field: Field<'_>, limit: u64) -> ApiResult<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        let len = u64::try_from(buf.len() + chunk.len()).unwrap_or(u64::MAX);
        if len > limit {
            return Err(too_large(limit));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn too_large(limit: u64) -> ApiError {
    ApiError::PayloadTooLarge(format!("file exceeds the {limit} byte limit"))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
