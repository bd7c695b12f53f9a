//! Login handlers
//!
//! OAuth2 authorization-code flow against the platform, session cookie
//! issue, and logout.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use roster_common::AppError;
use roster_core::MemberId;
use roster_service::{MembershipMirror, PermissionResolver};
use serde::Deserialize;

use crate::extractors::{
    oauth_state_cookie, oauth_state_removal, removal_cookie, session_cookie, OAUTH_STATE_COOKIE,
};
use crate::oauth::generate_state;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query the provider sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Start a login
///
/// GET /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    if !state.oauth().is_configured() {
        return Err(AppError::Config("OAuth client is not configured".to_string()).into());
    }

    let csrf = generate_state();
    let url = state.oauth().authorize_url(&csrf).map_err(ApiError::internal)?;
    let jar = jar.add(oauth_state_cookie(csrf, state.secure_cookies()));
    Ok((jar, Redirect::to(url.as_str())))
}

/// Finish a login
///
/// GET /callback
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Response> {
    if let Some(error) = query.error {
        return Err(ApiError::OAuth(error));
    }

    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    match (expected, query.state) {
        (Some(expected), Some(got)) if !expected.is_empty() && expected == got => {}
        _ => return Err(AppError::OAuthStateMismatch.into()),
    }
    let jar = jar.add(oauth_state_removal());

    let code = query
        .code
        .ok_or_else(|| AppError::InvalidInput("missing authorization code".to_string()))?;

    let access_token = state
        .oauth()
        .exchange_code(&code)
        .await
        .map_err(|e| ApiError::OAuth(format!("{e:#}")))?;
    let identity = state
        .oauth()
        .fetch_identity(&access_token)
        .await
        .map_err(|e| ApiError::OAuth(format!("{e:#}")))?;

    let ctx = state.service_context();
    let user_id = MemberId::new(identity.id.clone());

    // Mirror may lag behind the gateway; take the platform's current view
    match ctx.platform().fetch_member(&user_id).await {
        Ok(Some(member)) => {
            MembershipMirror::new(ctx).upsert(member).await;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Member lookup failed at login"),
    }

    let access = PermissionResolver::new(ctx).refresh_snapshot(&user_id).await;
    if !access.may_enter() {
        tracing::info!(user_id = %user_id, "Login refused");
        // The state cookie goes too
        return Ok((jar, ApiError::AccessRevoked).into_response());
    }

    let token = state
        .sessions()
        .issue(&user_id, Some(identity.display_name()))?;
    tracing::info!(user_id = %user_id, admin = access.is_admin, "Logged in");

    let jar = jar.add(session_cookie(token, state.secure_cookies()));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Log out
///
/// GET /logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(removal_cookie()), Redirect::to("/"))
}
