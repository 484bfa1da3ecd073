//! Password Credentials
//!
//! Salted, memory-hard password hashing with:
//! - Argon2id raw key derivation (16-byte random salt, 64-byte key)
//! - `hex(key).hex(salt)` credential encoding
//! - Constant-time comparison on verification
//! - Zeroization of clear text and intermediate key material
//!
//! Verification fails closed: a malformed stored credential or a derivation
//! error yields `false`, never a panic.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{constant_time_eq, random_bytes};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 16;

/// Characters accepted as the required "special" character
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes
pub const KEY_LEN: usize = 64;

/// Separator between the encoded key and the encoded salt
pub const CREDENTIAL_SEPARATOR: char = '.';

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must not exceed {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Derivation parameters or the derivation itself failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored credential is not `hex(key).hex(salt)`
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Key derivation parameters
// ============================================================================

/// Argon2id cost parameters
///
/// Must be identical for hashing and verification of the same credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// OWASP baseline: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap profile for tests and local development
    pub const fn development() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Derive a `KEY_LEN` key from `(secret, salt)`
    fn derive(
        &self,
        secret: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, PasswordHashError> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        self.argon2()?
            .hash_password_into(secret, salt, key.as_mut())
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(key)
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new password for storage, enforcing the password policy
    ///
    /// Unicode is normalized using NFKC before validation. The first violated
    /// rule is reported.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Create a password that will only be compared against a stored credential
    ///
    /// No policy is applied, so tightening the policy never locks out
    /// existing accounts.
    pub fn for_verification(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let password = self.0.as_str();

        if password.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = password.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password.chars().any(char::is_control) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return Err(PasswordPolicyError::MissingSpecial);
        }

        Ok(())
    }

    /// Password bytes followed by the optional pepper
    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with a fresh random salt
    pub fn hash(
        &self,
        pepper: Option<&[u8]>,
        params: &KdfParams,
    ) -> Result<HashedPassword, PasswordHashError> {
        let salt = random_bytes(SALT_LEN);
        let key = params.derive(&self.peppered(pepper), &salt)?;

        Ok(HashedPassword {
            encoded: format!(
                "{}{}{}",
                hex::encode(key.as_ref()),
                CREDENTIAL_SEPARATOR,
                hex::encode(&salt)
            ),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored credential: `hex(derived_key).hex(salt)`
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    encoded: String,
}

impl HashedPassword {
    /// Restore from storage, validating the encoding
    pub fn from_encoded(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let encoded = s.into();
        decode_credential(&encoded).ok_or(PasswordHashError::InvalidHashFormat)?;
        Ok(Self { encoded })
    }

    pub fn as_encoded(&self) -> &str {
        &self.encoded
    }

    /// Well-formed credential with an all-zero key
    ///
    /// Verifying against it costs one full derivation and always fails.
    pub fn decoy() -> Self {
        Self {
            encoded: format!(
                "{}{}{}",
                "0".repeat(KEY_LEN * 2),
                CREDENTIAL_SEPARATOR,
                "0".repeat(SALT_LEN * 2)
            ),
        }
    }

    /// Verify a password against this credential
    ///
    /// Re-derives with the stored salt and compares in constant time.
    /// Returns `false` on any parse or derivation failure.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
        params: &KdfParams,
    ) -> bool {
        let Some((stored_key, salt)) = decode_credential(&self.encoded) else {
            return false;
        };

        match params.derive(&password.peppered(pepper), &salt) {
            Ok(derived) => constant_time_eq(&stored_key, derived.as_ref()),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Split and decode `hex(key).hex(salt)`, checking both lengths
fn decode_credential(encoded: &str) -> Option<(Zeroizing<Vec<u8>>, Vec<u8>)> {
    let (key_hex, salt_hex) = encoded.split_once(CREDENTIAL_SEPARATOR)?;
    let key = Zeroizing::new(hex::decode(key_hex).ok()?);
    let salt = hex::decode(salt_hex).ok()?;

    (key.len() == KEY_LEN && salt.len() == SALT_LEN).then_some((key, salt))
}

// ============================================================================
// Tests
// ============================================================================
