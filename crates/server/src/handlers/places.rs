//! Place CRUD handlers.

use crate::error::ApiResult;
use crate::handlers::common::{SuccessResponse, now, read_json, remove_photo_files};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use souvenir_core::{NewPlace, PlaceId, PlacePatch, PlaceWithPhotos};

/// GET /api/places
///
/// All places ordered by `sort_order`, then id, each with its photos.
pub async fn list_places(State(state): State<AppState>) -> ApiResult<Json<Vec<PlaceWithPhotos>>> {
    let store = state.metadata.load().await?;
    Ok(Json(store.list_places()))
}

/// GET /api/places/{id}
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PlaceWithPhotos>> {
    let id = PlaceId::parse(&id)?;
    let store = state.metadata.load().await?;
    Ok(Json(store.get_place(id)?))
}

/// POST /api/places
pub async fn create_place(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<PlaceWithPhotos>)> {
    let new: NewPlace = read_json(req).await?;

    let mut store = state.metadata.load().await?;
    let created = store.create_place(new, now())?;
    state.metadata.save(&store).await?;

    tracing::info!(
        place_id = %created.place.id,
        name = %created.place.name,
        "Place created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/places/{id}
///
/// Partial update: absent fields keep their value, and so do empty `name` or
/// `address` strings.
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<PlaceWithPhotos>> {
    let id = PlaceId::parse(&id)?;
    let patch: PlacePatch = read_json(req).await?;

    let mut store = state.metadata.load().await?;
    let updated = store.update_place(id, &patch)?;
    state.metadata.save(&store).await?;

    tracing::info!(place_id = %id, "Place updated");

    Ok(Json(updated))
}

/// DELETE /api/places/{id}
///
/// Cascades to the place's photos and their files.
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = PlaceId::parse(&id)?;

    let mut store = state.metadata.load().await?;
    let removed = store.remove_place(id)?;
    state.metadata.save(&store).await?;

    // Files go only once the records are saved
    let files_removed = remove_photo_files(state.storage.as_ref(), &removed.photos).await;

    tracing::info!(
        place_id = %id,
        photos = removed.photos.len(),
        files_removed,
        "Place deleted"
    );

    Ok(Json(SuccessResponse::ok()))
}
