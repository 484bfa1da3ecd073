use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

/// Every user, ordered by id (administrator view)
pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository + Sync,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list_users().await
    }
}
