//! Mirrored member views

use axum::{
    extract::{Path, State},
    Json,
};
use roster_core::MemberId;
use roster_service::dto::{MemberDetailResponse, MembersView};
use roster_service::DashboardService;

use crate::extractors::AdminUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /members
pub async fn list_members(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<MembersView>> {
    let view = DashboardService::new(state.service_context()).members().await?;
    Ok(Json(view))
}

/// GET /members/:id
pub async fn get_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<MemberDetailResponse>> {
    let detail = DashboardService::new(state.service_context())
        .member_detail(&MemberId::new(user_id))
        .await?;
    Ok(Json(detail))
}
