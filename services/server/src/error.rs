//! Custom error types for the Playdeck server
//!
//! One taxonomy covers the whole surface: validation failures are always
//! client-fixable (400), ownership failures never confirm the existence of
//! another user's data, and store failures surface as 500 without retry.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use common::error::StoreError;

/// Custom error type for the Playdeck server
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing required input
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid identity proof
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Valid identity, wrong owner
    #[error("{0}")]
    Forbidden(String),

    /// No such playlist or track for this owner
    #[error("{0}")]
    NotFound(String),

    /// Duplicate item
    #[error("{0}")]
    Conflict(String),

    /// Catalog lookup quota exhausted
    #[error("Catalog rate limited")]
    RateLimited,

    /// Catalog lookup transient failure
    #[error("{0}")]
    Unavailable(String),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl From<crate::repositories::PlaylistError> for ApiError {
    fn from(e: crate::repositories::PlaylistError) -> Self {
        use crate::repositories::PlaylistError;
        match e {
            PlaylistError::Validation(msg) => ApiError::Validation(msg),
            PlaylistError::PlaylistNotFound | PlaylistError::TrackNotFound => {
                ApiError::NotFound(e.to_string())
            }
            PlaylistError::NotOwner => ApiError::Forbidden(e.to_string()),
            PlaylistError::Duplicate => ApiError::Conflict(e.to_string()),
            PlaylistError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<crate::repositories::UserError> for ApiError {
    fn from(e: crate::repositories::UserError) -> Self {
        use crate::repositories::UserError;
        match e {
            UserError::UsernameTaken(_) => ApiError::Conflict(e.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthenticated,
            UserError::Hash(msg) => {
                tracing::error!("Credential hashing failure: {}", msg);
                ApiError::Internal
            }
            UserError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<crate::catalog::CatalogError> for ApiError {
    fn from(e: crate::catalog::CatalogError) -> Self {
        use crate::catalog::CatalogError;
        match e {
            CatalogError::InvalidQuery => ApiError::Validation(e.to_string()),
            CatalogError::RateLimited => ApiError::RateLimited,
            CatalogError::Unavailable(msg) => ApiError::Unavailable(msg),
        }
    }
}

impl From<crate::storage::UploadError> for ApiError {
    fn from(e: crate::storage::UploadError) -> Self {
        use crate::storage::UploadError;
        match e {
            UploadError::MissingFile | UploadError::UnsupportedType | UploadError::TooLarge(_) => {
                ApiError::Validation(e.to_string())
            }
            UploadError::Io(io) => {
                tracing::error!("Upload I/O error: {}", io);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Catalog rate limited, try again later".to_string(),
            ),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
