//! Photo upload and deletion handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{SuccessResponse, now, remove_photo_files};
use crate::state::AppState;
use crate::upload::UploadBatch;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use souvenir_core::{Photo, PhotoId, PlaceId};

/// POST /api/places/{id}/photos
///
/// Stores every allowed image of the `photos` field and records one photo per
/// file. Returns the created photos, which may be empty.
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Vec<Photo>>)> {
    let place_id = PlaceId::parse(&id)?;
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut store = state.metadata.load().await?;

    // Checked before any file is written
    if !store.contains_place(place_id) {
        return Err(souvenir_core::Error::PlaceNotFound(place_id).into());
    }

    let mut batch = UploadBatch::new(state.storage.as_ref(), &state.config.upload);
    if let Err(e) = batch.receive(&mut multipart).await {
        batch.discard().await;
        return Err(e);
    }

    let created_at = now();
    let recorded: ApiResult<Vec<Photo>> = batch
        .files()
        .iter()
        .map(|file| {
            store
                .add_photo(place_id, &file.filename, &file.original_name, created_at)
                .map_err(ApiError::from)
        })
        .collect();
    let saved = match recorded {
        Ok(photos) => state.metadata.save(&store).await.map(|()| photos).map_err(ApiError::from),
        Err(e) => Err(e),
    };
    let photos = match saved {
        Ok(photos) => photos,
        Err(e) => {
            batch.discard().await;
            return Err(e);
        }
    };

    tracing::info!(
        place_id = %place_id,
        uploaded = photos.len(),
        bytes = batch.total_size(),
        skipped = batch.skipped(),
        "Photos uploaded"
    );

    Ok((StatusCode::CREATED, Json(photos)))
}

/// DELETE /api/photos/{id}
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = PhotoId::parse(&id)?;

    let mut store = state.metadata.load().await?;
    let photo = store.remove_photo(id)?;
    state.metadata.save(&store).await?;

    remove_photo_files(state.storage.as_ref(), std::slice::from_ref(&photo)).await;

    tracing::info!(photo_id = %id, place_id = %photo.place_id, "Photo deleted");

    Ok(Json(SuccessResponse::ok()))
}
