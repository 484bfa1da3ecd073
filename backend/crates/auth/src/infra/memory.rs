//! In-memory repository implementation
//!
//! Process-lifetime storage for users and sessions. Each table sits behind
//! its own `RwLock`; uniqueness checks run under the same write lock as the
//! insert they guard.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use kernel::value_object::email::Email;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::NewUser, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

struct UserTable {
    rows: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: UserId::from_raw(1),
        }
    }
}

impl UserTable {
    fn email_taken(&self, email: &Email) -> bool {
        self.rows.values().any(|user| &user.email == email)
    }
}

#[derive(Default)]
struct Inner {
    users: RwLock<UserTable>,
    sessions: RwLock<HashMap<Uuid, AuthSession>>,
}

/// In-memory user and session repository
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    inner: Arc<Inner>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}

// ============================================================================
// User Repository
// ============================================================================

impl UserRepository for MemoryAuthRepository {
    async fn create_user(&self, user: NewUser) -> AuthResult<User> {
        let mut table = self.inner.users.write().await;

        if table.email_taken(&user.email) {
            return Err(AuthError::EmailTaken);
        }

        let user_id = table.next_id;
        table.next_id = user_id.next();

        let user = user.into_user(user_id);
        table.rows.insert(user_id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.inner.users.read().await.rows.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let table = self.inner.users.read().await;
        Ok(table.rows.values().find(|u| &u.email == email).cloned())
    }

    async fn list_users(&self) -> AuthResult<Vec<User>> {
        Ok(self.inner.users.read().await.rows.values().cloned().collect())
    }

    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> AuthResult<User> {
        let mut table = self.inner.users.write().await;
        let row = table.rows.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
        row.set_role(role);
        Ok(row.clone())
    }

    async fn update_user_password(
        &self,
        user_id: UserId,
        password: UserPassword,
    ) -> AuthResult<User> {
        let mut table = self.inner.users.write().await;
        let row = table.rows.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
        row.set_password(password);
        Ok(row.clone())
    }

    async fn count_users(&self) -> AuthResult<u64> {
        Ok(self.inner.users.read().await.rows.len() as u64)
    }
}

// ============================================================================
// Auth Session Repository
// ============================================================================

impl AuthSessionRepository for MemoryAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        self.inner
            .sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let sessions = self.inner.sessions.read().await;
        match sessions.get(&session_id) {
            None => Ok(None),
            Some(session) if session.matches_fingerprint(fingerprint_hash) => {
                Ok(Some(session.clone()))
            }
            Some(_) => Err(AuthError::SessionFingerprintMismatch),
        }
    }

    async fn update_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut sessions = self.inner.sessions.write().await;
        // A concurrent logout wins over an activity update
        if let Some(row) = sessions.get_mut(&session.session_id) {
            *row = session.clone();
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<bool> {
        Ok(self
            .inner
            .sessions
            .write()
            .await
            .remove(&session_id)
            .is_some())
    }

    async fn delete_sessions_for_user(
        &self,
        user_id: UserId,
        except: Option<Uuid>,
    ) -> AuthResult<u64> {
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, s| s.user_id != user_id || Some(*id) == except);
        Ok((before - sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now_ms));
        Ok((before - sessions.len()) as u64)
    }
}
