//! API DTOs (Data Transfer Objects)
//!
//! Request fields default to empty so a missing field is reported as a
//! validation message rather than a body-parse failure.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Requests
// ============================================================================

/// POST /api/register
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// POST /api/login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/user/password
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PATCH /api/admin/users/{id}/role
///
/// Kept as a string so unknown codes surface as `Invalid role`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user; the password credential is never included
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            address: user.address.as_str().to_string(),
            role: user.user_role,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
