//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::value_object::{address::Address, display_name::DisplayName, email::Email};

use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};

/// User entity
///
/// Carries the password credential; it must never leave the auth crate in
/// a response (see `presentation::dto::UserResponse`).
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique across users, stored lowercased
    pub email: Email,
    pub address: Address,
    pub password: UserPassword,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User data before the repository assigns an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: Email,
    pub address: Address,
    pub password: UserPassword,
    pub user_role: UserRole,
}

impl NewUser {
    pub fn into_user(self, user_id: UserId) -> User {
        let now = Utc::now();

        User {
            user_id,
            name: self.name,
            email: self.email,
            address: self.address,
            password: self.password,
            user_role: self.user_role,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    /// Replace the password credential
    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }
}
