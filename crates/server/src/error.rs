//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("storage error: {0}")]
    Storage(#[from] souvenir_storage::StorageError),

    #[error("metadata error: {0}")]
    Metadata(#[from] souvenir_metadata::MetadataError),

    #[error(transparent)]
    Core(#[from] souvenir_core::Error),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Storage(e) if e.is_not_found() => "not_found",
            Self::Storage(_) => "storage_error",
            Self::Metadata(_) => "metadata_error",
            Self::Core(e) => match e {
                souvenir_core::Error::InvalidId(_)
                | souvenir_core::Error::PlaceNotFound(_)
                | souvenir_core::Error::PhotoNotFound(_) => "not_found",
                souvenir_core::Error::MissingFields(_) => "missing_fields",
                souvenir_core::Error::InvalidFilename(_) => "invalid_filename",
                souvenir_core::Error::IdsExhausted(_) => "ids_exhausted",
                souvenir_core::Error::Config(_) => "config_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(e) => match e {
                souvenir_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                souvenir_storage::StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(e) => match e {
                // Unparseable ids can never match a record
                souvenir_core::Error::InvalidId(_)
                | souvenir_core::Error::PlaceNotFound(_)
                | souvenir_core::Error::PhotoNotFound(_) => StatusCode::NOT_FOUND,
                souvenir_core::Error::MissingFields(_)
                | souvenir_core::Error::InvalidFilename(_) => StatusCode::BAD_REQUEST,
                souvenir_core::Error::IdsExhausted(_) | souvenir_core::Error::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
