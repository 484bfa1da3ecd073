//! Email Value Object
//!
//! A syntactically valid address, stored trimmed and lowercased so that
//! equality is case-insensitive.

use crate::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalize
    pub fn new(email: impl AsRef<str>) -> AppResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email is required"));
        }

        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must not exceed {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(AppError::bad_request("Invalid email format"));
        };

        if !is_valid_local_part(local) || !is_valid_domain(domain) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or("")
    }
}

fn is_valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= LOCAL_PART_MAX_LENGTH
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.chars().any(|c| c.is_whitespace() || c == '@')
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
