//! HTTP server for Souvenir, a personal map of visited places.
//!
//! This crate provides:
//! - The `/api` REST endpoints for places and photos
//! - Multipart photo upload with an image allow-list and size limits
//! - Serving of stored photos, the admin page and static assets

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
