//! Core domain types and shared logic for the Souvenir places map.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Places and their photos
//! - The `Store` aggregate holding every record and the id counters
//! - The image allow-list and upload file naming
//! - Configuration shared by the server and the backends

pub mod config;
pub mod error;
pub mod image;
pub mod photo;
pub mod place;
pub mod store;

pub use error::{Error, Result};
pub use image::{ImageKind, generate_filename};
pub use photo::{Photo, PhotoId};
pub use place::{NewPlace, Place, PlaceId, PlacePatch, PlaceWithPhotos};
pub use store::{RemovedPlace, Store};

/// Default maximum size of a single uploaded photo: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default maximum number of photos accepted by one upload request.
pub const DEFAULT_MAX_FILES: usize = 10;
