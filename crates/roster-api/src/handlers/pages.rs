//! Logged-in pages: announcements and attendance

use axum::{extract::State, response::Redirect, Json};
use roster_service::dto::{AnnouncementsView, AttendanceView, StatusView};
use roster_service::DashboardService;

use crate::extractors::{AdminUser, LoggedInUser};
use crate::state::AppState;

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/announcements")
}

/// GET /announcements
pub async fn announcements(
    State(state): State<AppState>,
    user: LoggedInUser,
) -> Json<AnnouncementsView> {
    let view = DashboardService::new(state.service_context())
        .announcements(&user.user_id, user.name(), user.access)
        .await;
    Json(view)
}

/// GET /attendance
pub async fn attendance(State(state): State<AppState>, user: LoggedInUser) -> Json<AttendanceView> {
    let view = DashboardService::new(state.service_context())
        .attendance(&user.user_id, user.name(), user.access)
        .await;
    Json(view)
}

/// POST /checkin
pub async fn check_in(State(state): State<AppState>, user: LoggedInUser) -> Redirect {
    DashboardService::new(state.service_context())
        .check_in(&user.user_id, user.name())
        .await;
    Redirect::to("/attendance")
}

/// POST /checkout
pub async fn check_out(State(state): State<AppState>, user: LoggedInUser) -> Redirect {
    DashboardService::new(state.service_context())
        .check_out(&user.user_id, user.name())
        .await;
    Redirect::to("/attendance")
}

/// GET /status
pub async fn status(State(state): State<AppState>, _admin: AdminUser) -> Json<StatusView> {
    Json(DashboardService::new(state.service_context()).status())
}
