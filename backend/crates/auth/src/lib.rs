//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Repository implementations (in-memory)
//! - `presentation/` - HTTP handlers, DTOs, extractors, router
//!
//! ## Features
//! - Registration and sign-in with email + password
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Role-based access (`admin`, `user`, `store_owner`) via extractors
//! - Self-service password change, administrator role management
//!
//! ## Security Model
//! - Passwords hashed with salted Argon2id, verified in constant time
//! - Sessions bound to client fingerprint (User-Agent)
//! - Sliding idle expiry plus background reaping of expired sessions
//! - Password change revokes the user's other sessions

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;
pub use presentation::extract::{CurrentUser, RequireAdmin, RequireStoreOwner};
pub use presentation::router::{auth_router, with_session};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
