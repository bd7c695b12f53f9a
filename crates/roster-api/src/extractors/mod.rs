//! Axum extractors for request handling
//!
//! Session gates, session cookies, and validated JSON bodies.

mod auth;
mod session;
mod validated;

pub use auth::{AccessManager, AdminUser, LoggedInUser, SessionUser};
pub use session::{
    oauth_state_cookie, oauth_state_removal, read_session, removal_cookie, session_cookie,
    OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
pub use validated::ValidatedJson;
