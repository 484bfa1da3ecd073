//! User Password Value Object
//!
//! Domain wrapper over `platform::password` that turns policy and hashing
//! failures into user-facing `AppError`s.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::KdfParams;
//!
//! let params = KdfParams::development();
//! let raw = RawPassword::new("Abcd123!".to_string())?;
//! let hashed = UserPassword::from_raw(&raw, None, &params)?;
//! assert!(hashed.verify(&raw, None, &params));
//! # Ok::<(), kernel::error::app_error::AppError>(())
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, KdfParams, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a password that is about to be stored, enforcing the policy
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(policy_error)?;
        Ok(Self(clear_text))
    }

    /// Create a password that will only be checked against a stored hash
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    let action = match err {
        PasswordPolicyError::TooShort { .. } => "Please choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Please choose a shorter password",
        PasswordPolicyError::EmptyOrWhitespace => "Please enter a password",
        PasswordPolicyError::InvalidCharacter => "Please remove any control characters",
        PasswordPolicyError::MissingUppercase
        | PasswordPolicyError::MissingLowercase
        | PasswordPolicyError::MissingDigit
        | PasswordPolicyError::MissingSpecial => {
            "Use upper and lower case letters, a number and a special character"
        }
    };
    AppError::bad_request(err.to_string()).with_action(action)
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored password credential (`hex(key).hex(salt)`)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        params: &KdfParams,
    ) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper, params)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;

        Ok(Self(hashed))
    }

    /// Restore from the stored encoding
    pub fn from_encoded(encoded: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_encoded(encoded)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid stored password hash").with_source(e))
    }

    pub fn as_encoded(&self) -> &str {
        self.0.as_encoded()
    }

    /// Stand-in credential for accounts that do not exist
    pub fn decoy() -> Self {
        Self(HashedPassword::decoy())
    }

    /// Verify a raw password in constant time; malformed hashes never verify
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>, params: &KdfParams) -> bool {
        self.0.verify(raw.inner(), pepper, params)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
