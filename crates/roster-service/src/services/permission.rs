//! Permission resolution
//!
//! Decides, for one identity, whether it may administer the dashboard,
//! edit the login-eligible role list, or log in at all. Resolution reads the
//! mirror, the role registry and the settings cache and is redone on every
//! request.

use roster_core::entities::Member;
use roster_core::value_objects::{Access, Capability, MemberId, RoleId};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::mirror::MembershipMirror;

/// Permission resolver for dashboard access control
pub struct PermissionResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve access flags for `user_id`
    ///
    /// Never fails: an unknown identity or unreadable storage denies.
    #[instrument(skip(self))]
    pub async fn resolve(&self, user_id: &MemberId) -> Access {
        let Some(member) = MembershipMirror::new(self.ctx).get(user_id).await else {
            debug!("Identity not mirrored, denying");
            return Access::denied();
        };
        self.resolve_member(&member).await
    }

    /// Resolve access for an already loaded member
    pub async fn resolve_member(&self, member: &Member) -> Access {
        let access_config = self.ctx.access_config();

        let can_manage_access = holds(member, access_config.web_admin_role_id.as_ref());

        // Fixed override roles need no registry lookup
        if holds(member, access_config.special_role_id.as_ref())
            || holds(member, access_config.admin_role_id.as_ref())
        {
            return Access::administrator(can_manage_access);
        }

        let login_roles = self.ctx.settings().login_role_ids();
        let eligible = member.has_any_role(&login_roles);

        if member.role_ids.is_empty() {
            return Access {
                is_admin: false,
                can_manage_access,
                can_login: can_manage_access || eligible,
            };
        }

        let held: Vec<RoleId> = member.role_ids.iter().cloned().collect();
        let is_admin = match self.ctx.role_repo().find_by_ids(&held).await {
            Ok(roles) => roles
                .iter()
                .any(|role| role.grants(Capability::Administrator)),
            Err(e) => {
                warn!(user_id = %member.id, error = %e, "Role lookup failed, treating as non-admin");
                false
            }
        };

        Access {
            is_admin,
            can_manage_access,
            can_login: is_admin || can_manage_access || eligible,
        }
    }

    /// Resolve and store the result as the member's cached admin flag
    #[instrument(skip(self))]
    pub async fn refresh_snapshot(&self, user_id: &MemberId) -> Access {
        let access = self.resolve(user_id).await;
        MembershipMirror::new(self.ctx)
            .record_admin_snapshot(user_id, access.is_admin)
            .await;
        access
    }

    /// Resolve and demand admin
    ///
    /// # Errors
    /// Returns `ServiceError::PermissionDenied` when the identity is not an admin
    pub async fn require_admin(&self, user_id: &MemberId) -> ServiceResult<Access> {
        let access = self.resolve(user_id).await;
        if !access.is_admin {
            return Err(ServiceError::permission_denied("ADMINISTRATOR"));
        }
        Ok(access)
    }

    /// Resolve and demand the right to edit login-eligible roles
    ///
    /// # Errors
    /// Returns `ServiceError::PermissionDenied` when the identity lacks it
    pub async fn require_access_manager(&self, user_id: &MemberId) -> ServiceResult<Access> {
        let access = self.resolve(user_id).await;
        if !access.can_manage_access {
            return Err(ServiceError::permission_denied("MANAGE_ACCESS"));
        }
        Ok(access)
    }
}

fn holds(member: &Member, role: Option<&RoleId>) -> bool {
    role.is_some_and(|r| member.has_role(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::registry::RoleRegistry;
    use crate::testing::{platform_role, test_context_with, TestOptions};
    use roster_common::AccessConfig;
    use roster_core::traits::PlatformMember;

    fn access_config() -> AccessConfig {
        AccessConfig {
            admin_role_id: Some(RoleId::new("admin")),
            special_role_id: Some(RoleId::new("special")),
            web_admin_role_id: Some(RoleId::new("webadmin")),
        }
    }

    async fn ctx() -> ServiceContext {
        test_context_with(TestOptions {
            access: access_config(),
            ..TestOptions::default()
        })
        .await
        .0
    }

    async fn add_member(ctx: &ServiceContext, id: &str, roles: &[&str]) {
        MembershipMirror::new(ctx)
            .upsert(PlatformMember::new(
                id,
                Some(id),
                roles.iter().map(|r| RoleId::new(*r)),
            ))
            .await;
    }

    #[tokio::test]
    async fn test_unknown_identity_is_denied() {
        let ctx = ctx().await;
        let access = PermissionResolver::new(&ctx)
            .resolve(&MemberId::new("stranger"))
            .await;
        assert_eq!(access, Access::denied());
    }

    #[tokio::test]
    async fn test_special_role_grants_admin_without_registry() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &["special", "unknown"]).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert!(access.is_admin && access.can_login);
        assert!(!access.can_manage_access);
    }

    #[tokio::test]
    async fn test_admin_role_id_with_web_admin() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &["admin", "webadmin"]).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert_eq!(access, Access::administrator(true));
    }

    #[tokio::test]
    async fn test_empty_role_set() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &[]).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert!(!access.is_admin);
        assert_eq!(access.can_login, access.can_manage_access);
        assert!(!access.can_login);
    }

    #[tokio::test]
    async fn test_administrator_bit_from_registry() {
        let ctx = ctx().await;
        RoleRegistry::new(&ctx).upsert(platform_role("a", "Staff", 1 << 3)).await;
        add_member(&ctx, "u1", &["a"]).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert!(access.is_admin && access.can_login);
        assert!(!access.can_manage_access);
    }

    #[tokio::test]
    async fn test_login_eligible_role() {
        let ctx = ctx().await;
        RoleRegistry::new(&ctx).upsert(platform_role("m", "Member", 0)).await;
        ctx.settings()
            .set_login_role_ids(&[RoleId::new("m")])
            .await
            .unwrap();
        add_member(&ctx, "u1", &["m"]).await;
        add_member(&ctx, "u2", &["other"]).await;

        let resolver = PermissionResolver::new(&ctx);
        let u1 = resolver.resolve(&MemberId::new("u1")).await;
        assert!(!u1.is_admin && u1.can_login);

        let u2 = resolver.resolve(&MemberId::new("u2")).await;
        assert_eq!(u2, Access::denied());
    }

    #[tokio::test]
    async fn test_deleted_role_does_not_fail() {
        let ctx = ctx().await;
        let registry = RoleRegistry::new(&ctx);
        registry.upsert(platform_role("a", "Staff", 8)).await;
        add_member(&ctx, "u1", &["a"]).await;
        registry.remove(&RoleId::new("a")).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert_eq!(access, Access::denied());
    }

    #[tokio::test]
    async fn test_web_admin_may_enter_without_login_roles() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &["webadmin"]).await;

        let access = PermissionResolver::new(&ctx).resolve(&MemberId::new("u1")).await;
        assert!(access.can_manage_access && access.can_login && !access.is_admin);
    }

    #[tokio::test]
    async fn test_refresh_snapshot_stores_flag() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &["special"]).await;

        PermissionResolver::new(&ctx)
            .refresh_snapshot(&MemberId::new("u1"))
            .await;
        let member = MembershipMirror::new(&ctx).get(&MemberId::new("u1")).await.unwrap();
        assert!(member.is_admin);
    }

    #[tokio::test]
    async fn test_require_admin() {
        let ctx = ctx().await;
        add_member(&ctx, "u1", &[]).await;
        let err = PermissionResolver::new(&ctx)
            .require_admin(&MemberId::new("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
