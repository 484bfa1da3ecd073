//! Error Kind - Classification of errors
//!
//! Every crate-specific error (`AuthError`, `CatalogError`) reduces to one of
//! these kinds, which fixes its HTTP status and problem-details title.

use serde::Serialize;

/// エラー種別
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Conflict.status_code(), 409);
/// assert_eq!(ErrorKind::Conflict.as_str(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Payload validation, malformed JSON, non-numeric path ids
    BadRequest,
    /// No session, or bad credentials
    Unauthorized,
    /// Wrong role, or not the author of a rating
    Forbidden,
    /// Unknown user, store or rating
    NotFound,
    /// Duplicate user or store email
    Conflict,
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InternalServerError => 500,
        }
    }

    /// Reason phrase, used as the problem-details `title`
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    /// 5xx; these are logged at error level
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, ErrorKind::InternalServerError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
