//! Session extractors
//!
//! Reads the session cookie and re-resolves access on every request. Gated
//! handlers take one of:
//! - [`LoggedInUser`]: any identity that may enter
//! - [`AdminUser`]: administrators
//! - [`AccessManager`]: identities allowed to edit the login-role list

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use roster_core::{Access, MemberId};
use roster_service::{PermissionResolver, ServiceError};

use super::session::read_session;
use crate::response::ApiError;
use crate::state::AppState;

/// Identity from a valid session cookie, access not yet checked
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: MemberId,
    /// Display name captured at login
    pub name: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);

        let claims = read_session(&jar, app_state.sessions()).ok_or(ApiError::LoginRequired)?;
        Ok(Self {
            user_id: claims.member_id(),
            name: claims.name,
        })
    }
}

/// Logged-in identity with freshly resolved access
///
/// A session whose identity may no longer enter is revoked.
#[derive(Debug, Clone)]
pub struct LoggedInUser {
    pub user_id: MemberId,
    pub name: Option<String>,
    pub access: Access,
}

impl LoggedInUser {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for LoggedInUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let access = PermissionResolver::new(app_state.service_context())
            .resolve(&session.user_id)
            .await;
        if !access.may_enter() {
            tracing::info!(user_id = %session.user_id, "Session no longer allowed, revoking");
            return Err(ApiError::AccessRevoked);
        }

        Ok(Self {
            user_id: session.user_id,
            name: session.name,
            access,
        })
    }
}

/// Logged-in administrator
#[derive(Debug, Clone)]
pub struct AdminUser(pub LoggedInUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = LoggedInUser::from_request_parts(parts, state).await?;
        if !user.access.is_admin {
            return Err(ServiceError::permission_denied("ADMINISTRATOR").into());
        }
        Ok(Self(user))
    }
}

/// Logged-in identity allowed to edit the login-role list
#[derive(Debug, Clone)]
pub struct AccessManager(pub LoggedInUser);

#[async_trait]
impl<S> FromRequestParts<S> for AccessManager
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = LoggedInUser::from_request_parts(parts, state).await?;
        if !user.access.can_manage_access {
            return Err(ServiceError::permission_denied("MANAGE_ACCESS").into());
        }
        Ok(Self(user))
    }
}
