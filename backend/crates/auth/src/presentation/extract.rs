//! Request extractors
//!
//! Capability checks run as extractors, so a handler body is only reached
//! once the caller's role has been checked. The session middleware
//! (`check_auth_session`) must run first; it stores the resolved
//! [`CurrentUser`] in request extensions.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, OptionalFromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};
use kernel::id::UserId;
use platform::client::{ClientFingerprint, extract_fingerprint};
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Authenticated caller, as resolved for this request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: Uuid,
    pub user: User,
}

impl CurrentUser {
    pub fn user_id(&self) -> UserId {
        self.user.user_id
    }

    pub fn role(&self) -> UserRole {
        self.user.user_role
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// `Option<CurrentUser>` never rejects; anonymous callers get `None`
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

async fn require_user<S>(parts: &mut Parts, state: &S) -> Result<CurrentUser, AuthError>
where
    S: Send + Sync,
{
    <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state).await
}

/// Caller with the `admin` role
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = require_user(parts, state).await?;
        match user.role() {
            UserRole::Admin => Ok(RequireAdmin(user)),
            UserRole::User | UserRole::StoreOwner => {
                Err(AuthError::Forbidden("Admin access required"))
            }
        }
    }
}

/// Caller with the `store_owner` role
#[derive(Debug, Clone)]
pub struct RequireStoreOwner(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireStoreOwner
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = require_user(parts, state).await?;
        match user.role() {
            UserRole::StoreOwner => Ok(RequireStoreOwner(user)),
            UserRole::Admin | UserRole::User => {
                Err(AuthError::Forbidden("Store owner access required"))
            }
        }
    }
}

/// Fingerprint of the calling client
#[derive(Debug, Clone)]
pub struct ClientContext(pub ClientFingerprint);

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientContext(client_fingerprint(&parts.headers, &parts.extensions)))
    }
}

/// Socket address is only present when served with connect info
pub(crate) fn client_fingerprint(
    headers: &HeaderMap,
    extensions: &Extensions,
) -> ClientFingerprint {
    let direct_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    extract_fingerprint(headers, direct_ip)
}
