//! Auth Middleware
//!
//! Resolves the session cookie on every request. Failures never reject the
//! request; it simply proceeds without a [`CurrentUser`], and the extractors
//! decide whether that is acceptable.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::extract::{CurrentUser, client_fingerprint};

/// Middleware state
pub struct AuthMiddlewareState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthMiddlewareState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
        }
    }
}

/// Attach the caller's session, if any, to the request
///
/// A successful lookup slides the session expiry; the cookie is re-issued
/// with a fresh Max-Age unless the handler already set one (login, logout).
pub async fn check_auth_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let mut authenticated_token = None;
    if let Some(token) = token {
        let fingerprint = client_fingerprint(req.headers(), req.extensions());
        let use_case =
            CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

        match use_case.execute(&token, &fingerprint.hash).await {
            Ok(resolved) => {
                req.extensions_mut().insert(CurrentUser {
                    session_id: resolved.session.session_id,
                    user: resolved.user,
                });
                authenticated_token = Some(token);
            }
            Err(AuthError::SessionFingerprintMismatch) => {
                tracing::warn!(ip = ?fingerprint.ip, "Session presented by a different client");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie ignored");
            }
        }
    }

    let mut response = next.run(req).await;

    if let Some(token) = authenticated_token
        && !response.headers().contains_key(header::SET_COOKIE)
        && let Some(cookie) = state.config.session_cookie().set_header(&token)
    {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }

    response
}
