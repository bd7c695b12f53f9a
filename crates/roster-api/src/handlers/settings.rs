//! Admin forms: auto-roles, login roles, birthday settings

use axum::{extract::State, Json};
use roster_service::dto::{
    BirthdaySettingsView, RoleListView, UpdateAutoRolesRequest, UpdateBirthdaySettingsRequest,
    UpdateLoginRolesRequest,
};
use roster_service::DashboardService;

use crate::extractors::{AccessManager, AdminUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /auto-role
pub async fn get_auto_roles(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<RoleListView>> {
    let view = DashboardService::new(state.service_context()).auto_roles().await?;
    Ok(Json(view))
}

/// POST /auto-role
pub async fn update_auto_roles(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(request): ValidatedJson<UpdateAutoRolesRequest>,
) -> ApiResult<Json<RoleListView>> {
    tracing::info!(user_id = %admin.user_id, "Updating auto-roles");
    let view = DashboardService::new(state.service_context())
        .update_auto_roles(request)
        .await?;
    Ok(Json(view))
}

/// GET /login-roles
pub async fn get_login_roles(
    State(state): State<AppState>,
    _manager: AccessManager,
) -> ApiResult<Json<RoleListView>> {
    let view = DashboardService::new(state.service_context()).login_roles().await?;
    Ok(Json(view))
}

/// POST /login-roles
pub async fn update_login_roles(
    State(state): State<AppState>,
    AccessManager(manager): AccessManager,
    ValidatedJson(request): ValidatedJson<UpdateLoginRolesRequest>,
) -> ApiResult<Json<RoleListView>> {
    tracing::info!(user_id = %manager.user_id, "Updating login roles");
    let view = DashboardService::new(state.service_context())
        .update_login_roles(request)
        .await?;
    Ok(Json(view))
}

/// GET /birthday-settings
pub async fn get_birthday_settings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<BirthdaySettingsView>> {
    let view = DashboardService::new(state.service_context())
        .birthday_settings()
        .await?;
    Ok(Json(view))
}

/// POST /birthday-settings
pub async fn update_birthday_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(request): ValidatedJson<UpdateBirthdaySettingsRequest>,
) -> ApiResult<Json<BirthdaySettingsView>> {
    tracing::info!(user_id = %admin.user_id, "Updating birthday settings");
    let view = DashboardService::new(state.service_context())
        .update_birthday_settings(request)
        .await?;
    Ok(Json(view))
}
