//! Auto-role assignment for newly joined members

use roster_core::value_objects::MemberId;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

pub struct AutoRoleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AutoRoleService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add every configured auto-role to `user_id`
    ///
    /// Returns how many roles were added. A failing role is logged and the
    /// rest are still attempted.
    #[instrument(skip(self))]
    pub async fn assign(&self, user_id: &MemberId) -> usize {
        let role_ids = self.ctx.settings().auto_role_ids();
        if role_ids.is_empty() {
            return 0;
        }

        let mut added = 0;
        for role_id in &role_ids {
            match self.ctx.platform().add_role(user_id, role_id).await {
                Ok(()) => added += 1,
                Err(e) => warn!(role_id = %role_id, error = %e, "Failed to add auto-role"),
            }
        }

        info!(added, configured = role_ids.len(), "Auto-roles assigned");
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;
    use roster_core::value_objects::RoleId;

    #[tokio::test]
    async fn test_assigns_every_configured_role() {
        let (ctx, platform) = test_context().await;
        ctx.settings()
            .set_auto_role_ids(&[RoleId::new("R1"), RoleId::new("R2")])
            .await
            .unwrap();

        let added = AutoRoleService::new(&ctx).assign(&MemberId::new("U1")).await;
        assert_eq!(added, 2);
        assert_eq!(
            platform.added_roles(),
            vec![
                (MemberId::new("U1"), RoleId::new("R1")),
                (MemberId::new("U1"), RoleId::new("R2")),
            ]
        );
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let (ctx, platform) = test_context().await;
        assert_eq!(AutoRoleService::new(&ctx).assign(&MemberId::new("U1")).await, 0);
        assert!(platform.added_roles().is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_rest() {
        let (ctx, platform) = test_context().await;
        platform.fail_role(RoleId::new("R1"));
        ctx.settings()
            .set_auto_role_ids(&[RoleId::new("R1"), RoleId::new("R2")])
            .await
            .unwrap();

        let added = AutoRoleService::new(&ctx).assign(&MemberId::new("U1")).await;
        assert_eq!(added, 1);
        assert_eq!(
            platform.added_roles(),
            vec![(MemberId::new("U1"), RoleId::new("R2"))]
        );
    }
}
