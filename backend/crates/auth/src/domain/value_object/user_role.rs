use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    StoreOwner,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::User, UserRole::StoreOwner];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            User => "user",
            StoreOwner => "store_owner",
        }
    }

    /// Parse a role code; anything outside the closed set is `None`
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub const fn is_store_owner(&self) -> bool {
        matches!(self, UserRole::StoreOwner)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
