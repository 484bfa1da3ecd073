//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod change_role;
pub mod check_session;
pub mod config;
pub mod list_users;
pub mod seed_admin;
pub mod session;
pub mod session_reaper;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use change_role::ChangeRoleUseCase;
pub use check_session::{CheckSessionUseCase, ResolvedSession};
pub use config::AuthConfig;
pub use list_users::ListUsersUseCase;
pub use seed_admin::{AdminSeed, SeedAdminUseCase};
pub use session_reaper::spawn_session_reaper;
pub use sign_in::{ClientFingerprint, SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
