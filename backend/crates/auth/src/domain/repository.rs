//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use kernel::value_object::email::Email;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::NewUser, user::User};
use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user under the next id
    ///
    /// Fails with `EmailTaken` when the email is already registered; the
    /// check and the insert are atomic.
    async fn create_user(&self, user: NewUser) -> AuthResult<User>;

    async fn find_user(&self, user_id: UserId) -> AuthResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// All users ordered by id
    async fn list_users(&self) -> AuthResult<Vec<User>>;

    /// Set the role and return the updated record; `UserNotFound` if absent
    ///
    /// Only the role column is written, so a concurrent password change is
    /// never overwritten.
    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> AuthResult<User>;

    /// Set the password credential and return the updated record
    async fn update_user_password(
        &self,
        user_id: UserId,
        password: UserPassword,
    ) -> AuthResult<User>;

    async fn count_users(&self) -> AuthResult<u64>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find session by ID and verify fingerprint
    ///
    /// A session presented with a different fingerprint is an error, not a miss.
    async fn find_session(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Update session (e.g., last activity)
    async fn update_session(&self, session: &AuthSession) -> AuthResult<()>;

    /// Returns whether a session was removed
    async fn delete_session(&self, session_id: Uuid) -> AuthResult<bool>;

    /// Delete all sessions for a user (except current)
    async fn delete_sessions_for_user(&self, user_id: UserId, except: Option<Uuid>)
    -> AuthResult<u64>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
