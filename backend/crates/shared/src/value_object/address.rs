//! Postal address shared by users and stores

use crate::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const ADDRESS_MIN_LENGTH: usize = 5;
pub const ADDRESS_MAX_LENGTH: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl AsRef<str>) -> AppResult<Self> {
        let address = address.as_ref().trim();
        let len = address.chars().count();

        if len < ADDRESS_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Address must be at least {} characters",
                ADDRESS_MIN_LENGTH
            )));
        }
        if len > ADDRESS_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Address must not exceed {} characters",
                ADDRESS_MAX_LENGTH
            )));
        }

        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
