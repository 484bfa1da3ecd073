//! Sign Up Use Case
//!
//! Creates a new user account (role `user`) and signs it in.

use std::sync::Arc;

use kernel::validation::Violations;
use kernel::value_object::{address::Address, display_name::DisplayName, email::Email};
use platform::client::ClientFingerprint;

use crate::application::config::AuthConfig;
use crate::application::session::issue_session;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::AuthResult;

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    /// Session token for cookie
    pub session_token: String,
}

/// Validated registration fields
pub(crate) struct ValidatedProfile {
    pub name: DisplayName,
    pub email: Email,
    pub address: Address,
    pub password: RawPassword,
}

/// Validate every field, reporting all violations at once
pub(crate) fn validate_profile(
    name: &str,
    email: &str,
    address: &str,
    password: String,
) -> AuthResult<ValidatedProfile> {
    let mut v = Violations::new();
    let name = v.check("name", DisplayName::new(name));
    let email = v.check("email", Email::new(email));
    let address = v.check("address", Address::new(address));
    let password = v.check("password", RawPassword::new(password));

    let profile = name.zip(email).zip(address).zip(password).map(
        |(((name, email), address), password)| ValidatedProfile {
            name,
            email,
            address,
            password,
        },
    );

    Ok(v.finish_with(profile)?)
}

/// Sign up use case
pub struct SignUpUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignUpUseCase<U, S>
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
        input: SignUpInput,
        fingerprint: &ClientFingerprint,
    ) -> AuthResult<SignUpOutput> {
        let profile =
            validate_profile(&input.name, &input.email, &input.address, input.password)?;

        let password =
            UserPassword::from_raw(&profile.password, self.config.pepper(), &self.config.kdf)?;

        // Public registration never grants elevated roles
        let user = self
            .user_repo
            .create_user(NewUser {
                name: profile.name,
                email: profile.email,
                address: profile.address,
                password,
                user_role: UserRole::User,
            })
            .await?;

        let session_token =
            issue_session(self.session_repo.as_ref(), &self.config, user.user_id, fingerprint)
                .await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(SignUpOutput {
            user,
            session_token,
        })
    }
}
