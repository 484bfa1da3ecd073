//! Catalog Error Types
//!
//! Store and rating errors that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Store not found")]
    StoreNotFound,

    #[error("Rating not found")]
    RatingNotFound,

    /// Another store already uses this contact email
    #[error("Store email already registered")]
    StoreEmailTaken,

    /// `ownerId` does not reference an existing user
    #[error("Owner not found")]
    OwnerNotFound,

    /// Only the author of a rating may change it
    #[error("You can only update your own ratings")]
    NotRatingOwner,

    /// Errors raised by the user/session side
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Validation and other errors already expressed as `AppError`
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Auth(err) => err.status_code(),
            other => StatusCode::from_u16(other.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::StoreNotFound | CatalogError::RatingNotFound => ErrorKind::NotFound,
            CatalogError::StoreEmailTaken => ErrorKind::Conflict,
            CatalogError::OwnerNotFound => ErrorKind::BadRequest,
            CatalogError::NotRatingOwner => ErrorKind::Forbidden,
            CatalogError::Auth(err) => err.kind(),
            CatalogError::App(err) => err.kind(),
            CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            CatalogError::Auth(err) => err.into_app_error(),
            CatalogError::App(err) => err,
            CatalogError::OwnerNotFound => {
                AppError::invalid_field("ownerId", self.to_string())
            }
            CatalogError::Internal(_) => AppError::internal("Internal server error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::App(err) if err.is_server_error() => {
                tracing::error!(error = ?err, "Catalog internal error");
            }
            CatalogError::NotRatingOwner => {
                tracing::warn!("Rating update by non-author rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            // Logged by the auth side
            CatalogError::Auth(err) => err.into_response(),
            other => {
                other.log();
                other.into_app_error().into_response()
            }
        }
    }
}
