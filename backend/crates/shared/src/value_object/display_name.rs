//! Display name shared by users and stores

use crate::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trimmed, 3 to 60 characters (Unicode scalar values)
    pub fn new(name: impl AsRef<str>) -> AppResult<Self> {
        let name = name.as_ref().trim();
        let len = name.chars().count();

        if len < NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {} characters",
                NAME_MIN_LENGTH
            )));
        }
        if len > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must not exceed {} characters",
                NAME_MAX_LENGTH
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
