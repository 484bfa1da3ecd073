//! Auth Session Entity
//!
//! Server-side session referenced by the signed cookie token.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::client::ClientFingerprint;
use uuid::Uuid;

/// Auth session entity
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    pub user_id: UserId,
    /// Session expiration (Unix timestamp ms), slid forward on each use
    pub expires_at_ms: i64,
    /// Client fingerprint hash (User-Agent based)
    pub client_fingerprint_hash: [u8; 32],
    /// Client IP (optional, for logging)
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new auth session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, fingerprint: &ClientFingerprint, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_fingerprint_hash: fingerprint.hash,
            client_ip: fingerprint.ip_string(),
            user_agent: fingerprint.user_agent.clone(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    /// Record activity and slide the expiry to `now + ttl`
    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.last_activity_at = now;
        self.expires_at_ms = (now + ttl).timestamp_millis();
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }

    pub fn matches_fingerprint(&self, fingerprint_hash: &[u8]) -> bool {
        platform::crypto::constant_time_eq(&self.client_fingerprint_hash, fingerprint_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(ttl: Duration) -> AuthSession {
        let fp = ClientFingerprint::new(Some("test-agent"), None);
        AuthSession::new(UserId::from_raw(1), &fp, ttl)
    }

    #[test]
    fn test_new_session_is_live() {
        let s = session(Duration::hours(24));
        assert!(!s.is_expired());
        assert!(s.remaining_ms() > 0);
    }

    #[test]
    fn test_expiry() {
        let s = session(Duration::hours(1));
        assert!(s.is_expired_at(s.expires_at_ms + 1));
        assert!(!s.is_expired_at(s.expires_at_ms));
    }

    #[test]
    fn test_touch_slides_expiry() {
        let mut s = session(Duration::seconds(1));
        let before = s.expires_at_ms;
        s.touch(Duration::hours(24));
        assert!(s.expires_at_ms > before);
        assert!(s.last_activity_at >= s.created_at);
    }

    #[test]
    fn test_fingerprint_binding() {
        let s = session(Duration::hours(1));
        let same = ClientFingerprint::new(Some("test-agent"), Some("10.0.0.9".parse().unwrap()));
        let other = ClientFingerprint::new(Some("other-agent"), None);
        assert!(s.matches_fingerprint(&same.hash));
        assert!(!s.matches_fingerprint(&other.hash));
    }
}
