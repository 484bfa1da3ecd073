//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use kernel::error::app_error::AppError;
use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, ChangeRoleUseCase, ListUsersUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateRoleRequest, UserResponse,
};
use crate::presentation::extract::{ClientContext, CurrentUser, RequireAdmin};

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ClientContext(fingerprint): ClientContext,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        address: req.address,
        password: req.password,
    };

    let output = use_case.execute(input, &fingerprint).await?;
    let cookie = session_cookie(&state.config, &output.session_token)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(output.user)),
    ))
}

/// POST /api/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientContext(fingerprint): ClientContext,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, &fingerprint).await?;
    let cookie = session_cookie(&state.config, &output.session_token)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(output.user)),
    ))
}

/// POST /api/logout
///
/// Always succeeds and clears the cookie, even without a live session.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    if let Some(token) =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name)
    {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with an unusable session cookie");
        }
    }

    let cookie = state
        .config
        .session_cookie()
        .delete_header()
        .ok_or_else(|| AuthError::Internal("Unencodable cookie".to_string()))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/user
pub async fn current_user(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&current.user))
}

/// POST /api/user/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<ChangePasswordRequest>, AppError>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let use_case =
        ChangePasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = ChangePasswordInput {
        current_password: req.current_password,
        new_password: req.new_password,
    };

    let user = use_case
        .execute(current.user_id(), current.session_id, input)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

// ============================================================================
// Administration
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R>(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// PATCH /api/admin/users/{id}/role
pub async fn update_user_role<R>(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateRoleRequest>, AppError>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let user_id: UserId = id.parse().map_err(AppError::from)?;

    let user = ChangeRoleUseCase::new(state.repo.clone())
        .execute(user_id, &req.role)
        .await?;

    tracing::debug!(admin_id = %admin.user_id(), user_id = %user_id, "Role update applied");

    Ok(Json(UserResponse::from(user)))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie(config: &AuthConfig, token: &str) -> AuthResult<HeaderValue> {
    config
        .session_cookie()
        .set_header(token)
        .ok_or_else(|| AuthError::Internal("Unencodable session cookie".to_string()))
}
