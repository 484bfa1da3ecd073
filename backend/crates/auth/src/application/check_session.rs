//! Check Session Use Case
//!
//! Verifies a session token and resolves the user behind it.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::verify_session_token;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// A live session together with the current state of its user
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: AuthSession,
    pub user: User,
}

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
where
    U: UserRepository + Sync,
    S: AuthSessionRepository + Sync,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Resolve the session and slide its expiry
    ///
    /// The user is re-read on every call so role changes apply to sessions
    /// that already exist.
    pub async fn execute(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<ResolvedSession> {
        let session_id = verify_session_token(&self.config.session_secret, session_token)?;

        let mut session = self
            .session_repo
            .find_session(session_id, fingerprint_hash)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete_session(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let Some(user) = self.user_repo.find_user(session.user_id).await? else {
            self.session_repo.delete_session(session_id).await?;
            return Err(AuthError::SessionInvalid);
        };

        session.touch(self.config.session_idle_ttl_chrono());
        self.session_repo.update_session(&session).await?;

        Ok(ResolvedSession { session, user })
    }
}
