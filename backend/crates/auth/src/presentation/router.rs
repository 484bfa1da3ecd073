//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, check_auth_session};

/// Account and user-administration routes (mount under `/api`)
pub fn auth_router<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let state = AuthAppState { repo, config };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/user", get(handlers::current_user))
        .route("/user/password", post(handlers::change_password::<R>))
        .route("/admin/users", get(handlers::list_users::<R>))
        .route(
            "/admin/users/{id}/role",
            patch(handlers::update_user_role::<R>),
        )
        .with_state(state)
}

/// Wrap `router` with the session middleware
///
/// Apply once, to the fully merged router, so every route sees the caller.
pub fn with_session<R>(router: Router, repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let state = AuthMiddlewareState { repo, config };
    router.layer(middleware::from_fn_with_state(state, check_auth_session::<R>))
}
