//! Seed Admin Use Case
//!
//! Ensures an administrator account exists at startup. Idempotent: an
//! existing account with the configured email is left as it is.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sign_up::validate_profile;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Administrator account to provision
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            email: "admin@store-ratings.com".to_string(),
            address: "System Address".to_string(),
            password: "Admin@123".to_string(),
        }
    }
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct SeedAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SeedAdminUseCase<U>
where
    U: UserRepository + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Returns the created administrator, or `None` when the email already exists
    pub async fn execute(&self, seed: AdminSeed) -> AuthResult<Option<User>> {
        let profile = validate_profile(&seed.name, &seed.email, &seed.address, seed.password)?;

        if let Some(existing) = self.user_repo.find_user_by_email(&profile.email).await? {
            tracing::debug!(user_id = %existing.user_id, "Admin account already present");
            return Ok(None);
        }

        let password =
            UserPassword::from_raw(&profile.password, self.config.pepper(), &self.config.kdf)?;

        let created = self
            .user_repo
            .create_user(NewUser {
                name: profile.name,
                email: profile.email,
                address: profile.address,
                password,
                user_role: UserRole::Admin,
            })
            .await;

        match created {
            Ok(user) => {
                tracing::info!(user_id = %user.user_id, "Admin account seeded");
                Ok(Some(user))
            }
            // Lost a race with a concurrent seed or registration
            Err(AuthError::EmailTaken) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
