//! Sign In Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use kernel::validation::Violations;
use kernel::value_object::email::Email;

use crate::application::config::AuthConfig;
use crate::application::session::issue_session;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Re-export ClientFingerprint from platform
pub use platform::client::ClientFingerprint;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    /// Session token for cookie
    pub session_token: String,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
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

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: &ClientFingerprint,
    ) -> AuthResult<SignInOutput> {
        let mut v = Violations::new();
        if input.email.trim().is_empty() {
            v.push("email", "Email is required");
        }
        if input.password.is_empty() {
            v.push("password", "Password is required");
        }
        v.finish()?;

        // A malformed email cannot belong to an account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_verification(input.password);
        let Some(user) = self.user_repo.find_user_by_email(&email).await? else {
            // Unknown accounts pay the same derivation cost as a wrong password
            UserPassword::decoy()
                .verify(&raw_password, self.config.pepper(), &self.config.kdf);
            return Err(AuthError::InvalidCredentials);
        };

        if !user
            .password
            .verify(&raw_password, self.config.pepper(), &self.config.kdf)
        {
            return Err(AuthError::InvalidCredentials);
        }

        let session_token =
            issue_session(self.session_repo.as_ref(), &self.config, user.user_id, fingerprint)
                .await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput {
            user,
            session_token,
        })
    }
}
