//! Dashboard views
//!
//! Builds the view models behind each page and applies the admin forms.
//! Gating happens before these methods are called; the caller has already
//! resolved the viewer's access for this request.

use roster_core::entities::AttendanceRecord;
use roster_core::value_objects::{Access, ChannelId, MemberId, RoleId};
use tracing::{info, instrument};

use crate::dto::{
    AnnouncementsView, AttendanceRecordResponse, AttendanceView, BirthdayEntryResponse,
    BirthdaySettingsView, BoardEntryResponse, MemberDetailResponse, MemberResponse, MembersView,
    RoleListView, RoleResponse, StatusView, TimelineResponse, UpdateAutoRolesRequest,
    UpdateBirthdaySettingsRequest, UpdateLoginRolesRequest, ViewerResponse,
};

use super::birthday::BirthdayService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::mirror::MembershipMirror;
use super::permission::PermissionResolver;
use super::registry::RoleRegistry;
use super::settings::{BirthdaySettings, DEFAULT_CHANNEL_FORMAT};

fn records(records: &[AttendanceRecord]) -> Vec<AttendanceRecordResponse> {
    records.iter().map(AttendanceRecordResponse::from).collect()
}

fn role_ids(raw: &[String]) -> Vec<RoleId> {
    raw.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(RoleId::new)
        .collect()
}

fn non_blank(raw: Option<&String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Display name for `user_id`: mirror first, then the session's copy
    async fn display_name(&self, user_id: &MemberId, fallback: Option<&str>) -> String {
        match MembershipMirror::new(self.ctx).get(user_id).await {
            Some(member) if member.display_name.is_some() => member.label().to_string(),
            _ => fallback.unwrap_or(user_id.as_str()).to_string(),
        }
    }

    pub async fn viewer(
        &self,
        user_id: &MemberId,
        session_name: Option<&str>,
        access: Access,
    ) -> ViewerResponse {
        ViewerResponse {
            id: user_id.to_string(),
            display_name: self.display_name(user_id, session_name).await,
            access,
        }
    }

    pub async fn announcements(
        &self,
        user_id: &MemberId,
        session_name: Option<&str>,
        access: Access,
    ) -> AnnouncementsView {
        AnnouncementsView {
            viewer: self.viewer(user_id, session_name, access).await,
        }
    }

    // ========================================================================
    // Attendance
    // ========================================================================

    pub async fn attendance(
        &self,
        user_id: &MemberId,
        session_name: Option<&str>,
        access: Access,
    ) -> AttendanceView {
        let log = self.ctx.attendance();
        AttendanceView {
            viewer: self.viewer(user_id, session_name, access).await,
            board: log.board().iter().map(BoardEntryResponse::from).collect(),
            history: records(&log.history(user_id)),
        }
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            timelines: self
                .ctx
                .attendance()
                .all()
                .into_iter()
                .map(|(user_id, timeline)| TimelineResponse {
                    user_id: user_id.to_string(),
                    records: records(&timeline),
                })
                .collect(),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_in(&self, user_id: &MemberId, session_name: Option<&str>) {
        let name = self.display_name(user_id, session_name).await;
        self.ctx
            .attendance()
            .check_in(user_id, &name, self.ctx.clock().now());
    }

    #[instrument(skip(self))]
    pub async fn check_out(&self, user_id: &MemberId, session_name: Option<&str>) {
        let name = self.display_name(user_id, session_name).await;
        self.ctx
            .attendance()
            .check_out(user_id, &name, self.ctx.clock().now());
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub async fn members(&self) -> ServiceResult<MembersView> {
        let members: Vec<MemberResponse> = MembershipMirror::new(self.ctx)
            .list()
            .await?
            .iter()
            .map(MemberResponse::from)
            .collect();
        Ok(MembersView {
            count: members.len(),
            members,
        })
    }

    #[instrument(skip(self))]
    pub async fn member_detail(&self, user_id: &MemberId) -> ServiceResult<MemberDetailResponse> {
        let member = MembershipMirror::new(self.ctx)
            .get(user_id)
            .await
            .ok_or_else(|| ServiceError::not_found("Member", user_id.as_str()))?;

        let held: Vec<RoleId> = member.role_ids.iter().cloned().collect();
        let roles = RoleRegistry::new(self.ctx).list_by_ids(&held).await?;
        let unknown_role_ids = held
            .iter()
            .filter(|id| !roles.iter().any(|r| &r.id == *id))
            .map(ToString::to_string)
            .collect();

        let access = PermissionResolver::new(self.ctx).resolve_member(&member).await;
        let birthday = BirthdayService::new(self.ctx)
            .find(user_id)
            .await?
            .map(|entry| entry.date.to_string());

        Ok(MemberDetailResponse {
            member: MemberResponse::from(&member),
            roles: roles.iter().map(RoleResponse::from).collect(),
            unknown_role_ids,
            access,
            birthday,
            attendance: records(&self.ctx.attendance().history(user_id)),
        })
    }

    // ========================================================================
    // Settings pages
    // ========================================================================

    async fn all_roles(&self) -> ServiceResult<Vec<RoleResponse>> {
        Ok(RoleRegistry::new(self.ctx)
            .list_all()
            .await?
            .iter()
            .map(RoleResponse::from)
            .collect())
    }

    async fn role_list_view(&self, ids: Vec<RoleId>) -> ServiceResult<RoleListView> {
        Ok(RoleListView {
            role_ids: ids.into_iter().map(RoleId::into_inner).collect(),
            roles: self.all_roles().await?,
        })
    }

    pub async fn auto_roles(&self) -> ServiceResult<RoleListView> {
        self.role_list_view(self.ctx.settings().auto_role_ids()).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_auto_roles(
        &self,
        request: UpdateAutoRolesRequest,
    ) -> ServiceResult<RoleListView> {
        let ids = role_ids(&request.role_ids);
        self.ctx.settings().set_auto_role_ids(&ids).await?;
        info!(count = ids.len(), "Auto-roles updated");
        self.auto_roles().await
    }

    pub async fn login_roles(&self) -> ServiceResult<RoleListView> {
        self.role_list_view(self.ctx.settings().login_role_ids()).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_login_roles(
        &self,
        request: UpdateLoginRolesRequest,
    ) -> ServiceResult<RoleListView> {
        let ids = role_ids(&request.role_ids);
        self.ctx.settings().set_login_role_ids(&ids).await?;
        info!(count = ids.len(), "Login roles updated");
        self.login_roles().await
    }

    pub async fn birthday_settings(&self) -> ServiceResult<BirthdaySettingsView> {
        let settings = self.ctx.settings().birthday_settings();
        let entries = BirthdayService::new(self.ctx).list().await?;

        Ok(BirthdaySettingsView {
            category_id: settings.category_id.map(ChannelId::into_inner),
            channel_format: settings.channel_format,
            role_id: settings.role_id.map(RoleId::into_inner),
            roles: self.all_roles().await?,
            entries: entries.iter().map(BirthdayEntryResponse::from).collect(),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_birthday_settings(
        &self,
        request: UpdateBirthdaySettingsRequest,
    ) -> ServiceResult<BirthdaySettingsView> {
        let settings = BirthdaySettings {
            category_id: non_blank(request.category_id.as_ref()).map(ChannelId::new),
            channel_format: non_blank(request.channel_format.as_ref())
                .unwrap_or_else(|| DEFAULT_CHANNEL_FORMAT.to_string()),
            role_id: non_blank(request.role_id.as_ref()).map(RoleId::new),
        };
        self.ctx.settings().set_birthday_settings(&settings).await?;
        info!("Birthday settings updated");
        self.birthday_settings().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{platform_role, test_context};
    use roster_core::entities::AttendanceDirection;
    use roster_core::traits::PlatformMember;

    #[tokio::test]
    async fn test_check_in_uses_mirror_name() {
        let (ctx, _) = test_context().await;
        MembershipMirror::new(&ctx)
            .upsert(PlatformMember::new("u1", Some("Alice"), []))
            .await;
        let dashboard = DashboardService::new(&ctx);
        let u1 = MemberId::new("u1");

        dashboard.check_in(&u1, Some("stale")).await;
        dashboard.check_out(&MemberId::new("u2"), Some("Bob")).await;

        let view = dashboard.attendance(&u1, None, Access::denied()).await;
        assert_eq!(view.viewer.display_name, "Alice");
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].direction, AttendanceDirection::In);
        assert_eq!(view.board.len(), 2);

        let status = dashboard.status();
        assert_eq!(status.timelines.len(), 2);
        assert_eq!(status.timelines[1].records[0].display_name, "Bob");
    }

    #[tokio::test]
    async fn test_update_auto_roles_round_trip() {
        let (ctx, _) = test_context().await;
        RoleRegistry::new(&ctx).upsert(platform_role("1", "A", 0)).await;
        let dashboard = DashboardService::new(&ctx);

        let view = dashboard
            .update_auto_roles(UpdateAutoRolesRequest {
                role_ids: vec!["1".into(), " ".into(), "2".into()],
            })
            .await
            .unwrap();
        assert_eq!(view.role_ids, vec!["1", "2"]);
        assert_eq!(view.roles.len(), 1);
        assert_eq!(
            ctx.settings().auto_role_ids(),
            vec![RoleId::new("1"), RoleId::new("2")]
        );
    }

    #[tokio::test]
    async fn test_update_birthday_settings_defaults_format() {
        let (ctx, _) = test_context().await;
        let view = DashboardService::new(&ctx)
            .update_birthday_settings(UpdateBirthdaySettingsRequest {
                category_id: Some("10".into()),
                channel_format: None,
                role_id: Some(" ".into()),
            })
            .await
            .unwrap();
        assert_eq!(view.category_id.as_deref(), Some("10"));
        assert_eq!(view.channel_format, DEFAULT_CHANNEL_FORMAT);
        assert!(view.role_id.is_none());
    }

    #[tokio::test]
    async fn test_member_detail() {
        let (ctx, _) = test_context().await;
        RoleRegistry::new(&ctx).upsert(platform_role("1", "Staff", 8)).await;
        MembershipMirror::new(&ctx)
            .upsert(PlatformMember::new(
                "u1",
                Some("Alice"),
                [RoleId::new("1"), RoleId::new("9")],
            ))
            .await;

        let detail = DashboardService::new(&ctx)
            .member_detail(&MemberId::new("u1"))
            .await
            .unwrap();
        assert_eq!(detail.roles.len(), 1);
        assert_eq!(detail.unknown_role_ids, vec!["9"]);
        assert!(detail.access.is_admin);
        assert!(detail.birthday.is_none());

        let missing = DashboardService::new(&ctx)
            .member_detail(&MemberId::new("ghost"))
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }
}
