//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::{ClientContext, CurrentUser, RequireAdmin, RequireStoreOwner};
pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, check_auth_session};
pub use router::{auth_router, with_session};
