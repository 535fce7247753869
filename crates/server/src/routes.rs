//! Route configuration.

use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{any, delete, get, post};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.upload.body_limit();

    let api_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/places",
            get(handlers::list_places).post(handlers::create_place),
        )
        .route(
            "/api/places/{id}",
            get(handlers::get_place)
                .put(handlers::update_place)
                .delete(handlers::delete_place),
        )
        .route(
            "/api/places/{id}/photos",
            post(handlers::upload_photos).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/photos/{id}", delete(handlers::delete_photo))
        // Unknown API paths get a JSON 404 instead of the static fallback
        .route("/api/{*rest}", any(api_not_found));

    let server = &state.config.server;
    let static_routes = Router::new()
        .route("/uploads/{filename}", get(handlers::get_upload))
        .route_service(&server.admin_path, ServeFile::new(server.admin_page()))
        .fallback_service(ServeDir::new(&server.public_dir));

    Router::new()
        .merge(api_routes)
        .merge(static_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("no such API endpoint".to_string())
}
