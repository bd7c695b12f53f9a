//! Session and OAuth state cookies

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use roster_common::{SessionClaims, SessionService};

/// Cookie holding the signed session token
pub const SESSION_COOKIE: &str = "roster_session";

/// Cookie holding the CSRF state of an in-flight login
pub const OAUTH_STATE_COOKIE: &str = "roster_oauth_state";

fn base(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Session cookie carrying `token`
///
/// Lives for the browser session; the token's own expiry bounds it.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    base(SESSION_COOKIE, token, secure)
}

/// Cookie that deletes the session in the browser
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = base(SESSION_COOKIE, String::new(), false);
    cookie.make_removal();
    cookie
}

pub fn oauth_state_cookie(state: String, secure: bool) -> Cookie<'static> {
    base(OAUTH_STATE_COOKIE, state, secure)
}

pub fn oauth_state_removal() -> Cookie<'static> {
    let mut cookie = base(OAUTH_STATE_COOKIE, String::new(), false);
    cookie.make_removal();
    cookie
}

/// Verified claims of the request's session cookie, if any
pub fn read_session(jar: &CookieJar, sessions: &SessionService) -> Option<SessionClaims> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    match sessions.verify(&token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unusable session cookie");
            None
        }
    }
}
