//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::verify_session_token;
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: AuthSessionRepository + Sync,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session referenced by `session_token`
    ///
    /// Returns whether a live session was removed.
    pub async fn execute(&self, session_token: &str) -> AuthResult<bool> {
        let session_id = verify_session_token(&self.config.session_secret, session_token)?;
        let removed = self.session_repo.delete_session(session_id).await?;

        tracing::info!(session_id = %session_id, removed, "User signed out");
        Ok(removed)
    }
}
