//! Change Role Use Case (administrator only)

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

pub struct ChangeRoleUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ChangeRoleUseCase<U>
where
    U: UserRepository + Sync,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Unknown role codes are rejected before the user is touched
    pub async fn execute(&self, user_id: UserId, role_code: &str) -> AuthResult<User> {
        let role = UserRole::from_code(role_code).ok_or(AuthError::InvalidRole)?;

        let user = self.user_repo.update_user_role(user_id, role).await?;

        tracing::info!(user_id = %user_id, role = %role, "User role changed");

        Ok(user)
    }
}
