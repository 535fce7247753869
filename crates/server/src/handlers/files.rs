//! Serving stored photo files.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use souvenir_core::ImageKind;
use souvenir_core::image::validate_stored_name;

/// GET /uploads/{filename}
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    validate_stored_name(&filename)?;
    let data = state.storage.get(&filename).await?;

    let content_type = ImageKind::from_filename(&filename)
        .map(|kind| kind.content_type())
        .unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        data,
    ))
}
