//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;
use souvenir_core::Photo;
use souvenir_storage::{ObjectStore, ObjectStoreExt};
use time::OffsetDateTime;

/// Maximum size of a JSON request body.
pub const MAX_JSON_BODY_SIZE: usize = 1024 * 1024;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Read and parse a JSON request body.
pub async fn read_json<T: DeserializeOwned>(req: Request) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_JSON_BODY_SIZE)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Current time for new records.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Delete the files of removed photos.
///
/// Failures are logged and skipped: the records are already gone, and a
/// leftover file is harmless. Returns the number of files deleted.
pub async fn remove_photo_files(storage: &dyn ObjectStore, photos: &[Photo]) -> usize {
    let mut removed = 0;
    for photo in photos {
        match storage.delete_if_exists(&photo.filename).await {
            Ok(true) => removed += 1,
            Ok(false) => {
                tracing::warn!(
                    photo_id = %photo.id,
                    filename = %photo.filename,
                    "Photo file was already missing"
                );
            }
            Err(e) => {
                tracing::warn!(
                    photo_id = %photo.id,
                    filename = %photo.filename,
                    error = %e,
                    "Failed to delete photo file"
                );
            }
        }
    }
    removed
}
