//! Error types for the core domain.

use crate::photo::PhotoId;
use crate::place::PlaceId;
use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("place not found: {0}")]
    PlaceNotFound(PlaceId),

    #[error("photo not found: {0}")]
    PhotoNotFound(PhotoId),

    #[error("{0} are required")]
    MissingFields(String),

    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
