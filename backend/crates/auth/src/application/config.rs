//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::KdfParams;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Idle timeout; every authenticated request slides the expiry
    pub session_idle_ttl: Duration,
    /// How often the background reaper removes expired sessions
    pub session_reap_interval: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id cost parameters for hashing and verification
    pub kdf: KdfParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "store_rating_session".to_string(),
            session_secret: [0u8; 32],
            session_idle_ttl: Duration::from_secs(24 * 3600), // 24 hours
            session_reap_interval: Duration::from_secs(3600), // 1 hour
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            kdf: KdfParams::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_array(),
            ..Default::default()
        }
    }

    /// Create config for development and tests (insecure cookie, cheap KDF)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            kdf: KdfParams::development(),
            ..Self::with_random_secret()
        }
    }

    /// Idle TTL as a chrono duration, for session arithmetic
    pub fn session_idle_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_idle_ttl).unwrap_or(chrono::Duration::hours(24))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Session cookie attributes
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: i64::try_from(self.session_idle_ttl.as_secs()).ok(),
        }
    }
}
