//! Session tokens
//!
//! Cookie value format: `<session uuid>.<base64url(HMAC-SHA256(secret, uuid))>`.
//! The token only references the server-side session; it carries no claims.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use kernel::id::UserId;
use platform::client::ClientFingerprint;
use sha2::Sha256;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &[u8], session_id: &str) -> AuthResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("Invalid session secret: {e}")))?;
    mac.update(session_id.as_bytes());
    Ok(mac)
}

/// Generate signed session token
pub fn sign_session_token(secret: &[u8], session_id: Uuid) -> AuthResult<String> {
    let session_id = session_id.to_string();
    let signature = mac_for(secret, &session_id)?.finalize().into_bytes();

    Ok(format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature)))
}

/// Parse and verify session token
///
/// The signature check is constant time (`Mac::verify_slice`).
pub fn verify_session_token(secret: &[u8], token: &str) -> AuthResult<Uuid> {
    let (session_id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac_for(secret, session_id)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id.parse().map_err(|_| AuthError::SessionInvalid)
}

/// Create a session for `user_id` and return its signed cookie token
pub async fn issue_session<S>(
    session_repo: &S,
    config: &AuthConfig,
    user_id: UserId,
    fingerprint: &ClientFingerprint,
) -> AuthResult<String>
where
    S: AuthSessionRepository + Sync,
{
    let session = AuthSession::new(user_id, fingerprint, config.session_idle_ttl_chrono());
    session_repo.create_session(&session).await?;

    tracing::debug!(
        user_id = %user_id,
        session_id = %session.session_id,
        "Session created"
    );

    sign_session_token(&config.session_secret, session.session_id)
}
