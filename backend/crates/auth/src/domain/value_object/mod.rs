//! Value Objects
//!
//! Auth-specific value objects. Shared ones (email, names, addresses, ids)
//! live in `kernel`.

pub mod user_password;
pub mod user_role;

pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
