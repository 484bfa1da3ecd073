//! Change Password Use Case
//!
//! Self-service password change. Requires the current password and revokes
//! every other session of the user on success.

use std::sync::Arc;

use kernel::id::UserId;
use kernel::validation::Violations;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> ChangePasswordUseCase<U, S>
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

    /// `current_session` survives the revocation
    pub async fn execute(
        &self,
        user_id: UserId,
        current_session: Uuid,
        input: ChangePasswordInput,
    ) -> AuthResult<User> {
        let user = self
            .user_repo
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let current = RawPassword::for_verification(input.current_password);
        if !user
            .password
            .verify(&current, self.config.pepper(), &self.config.kdf)
        {
            tracing::warn!(user_id = %user_id, "Password change rejected");
            return Err(AuthError::CurrentPasswordIncorrect);
        }

        let mut v = Violations::new();
        let new_password = v.check("newPassword", RawPassword::new(input.new_password));
        let new_password = v.finish_with(new_password)?;

        let password =
            UserPassword::from_raw(&new_password, self.config.pepper(), &self.config.kdf)?;
        let user = self.user_repo.update_user_password(user_id, password).await?;

        let revoked = self
            .session_repo
            .delete_sessions_for_user(user_id, Some(current_session))
            .await?;

        tracing::info!(user_id = %user_id, revoked, "Password changed");

        Ok(user)
    }
}
