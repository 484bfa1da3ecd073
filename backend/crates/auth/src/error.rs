//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Another account already uses this email
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session attached to the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Session not found, expired, or token signature invalid
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Session presented by a different client
    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    /// Authenticated but the role does not allow the action
    #[error("{0}")]
    Forbidden(&'static str),

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Role code outside the closed set
    #[error("Invalid role")]
    InvalidRole,

    /// Validation and other errors already expressed as `AppError`
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::CurrentPasswordIncorrect | AuthError::InvalidRole => ErrorKind::BadRequest,
            AuthError::App(err) => err.kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Internal details never reach the response body.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::App(err) => err,
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::InvalidCredentials => AppError::unauthorized(self.to_string())
                .with_action("Check your email and password"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::App(err) if err.is_server_error() => {
                tracing::error!(error = ?err, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            AuthError::Forbidden(reason) => {
                tracing::info!(reason = %reason, "Access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
