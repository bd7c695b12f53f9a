//! Route definitions
//!
//! Dashboard pages, admin forms, and the login flow. Health checks are
//! exported separately so they bypass rate limiting.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, members, pages, settings};
use crate::state::AppState;

/// Create the main router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(page_routes())
        .merge(admin_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
}

/// Pages open to anyone allowed in
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/announcements", get(pages::announcements))
        .route("/attendance", get(pages::attendance))
        .route("/checkin", post(pages::check_in))
        .route("/checkout", post(pages::check_out))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(pages::status))
        .route("/members", get(members::list_members))
        .route("/members/:user_id", get(members::get_member))
        .route(
            "/auto-role",
            get(settings::get_auto_roles).post(settings::update_auto_roles),
        )
        .route(
            "/birthday-settings",
            get(settings::get_birthday_settings).post(settings::update_birthday_settings),
        )
        .route(
            "/login-roles",
            get(settings::get_login_roles).post(settings::update_login_roles),
        )
}
