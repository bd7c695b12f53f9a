//! Role registry
//!
//! Local copy of the guild's roles and their permission bitmasks.

use roster_core::entities::Role;
use roster_core::traits::PlatformRole;
use roster_core::value_objects::RoleId;
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct RoleRegistry<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleRegistry<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, role), fields(role_id = %role.id))]
    pub async fn upsert(&self, role: PlatformRole) -> bool {
        let role = role.into_role();
        match self.ctx.role_repo().upsert(&role).await {
            Ok(()) => {
                debug!(name = %role.name, admin = role.is_administrator(), "Role stored");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to store role");
                false
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, role_id: &RoleId) {
        if let Err(e) = self.ctx.role_repo().delete(role_id).await {
            warn!(error = %e, "Failed to remove role");
        }
    }

    /// Known roles among `ids`; unknown ids contribute nothing
    pub async fn list_by_ids(&self, ids: &[RoleId]) -> ServiceResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.ctx.role_repo().find_by_ids(ids).await?)
    }

    /// All roles ordered by name
    pub async fn list_all(&self) -> ServiceResult<Vec<Role>> {
        Ok(self.ctx.role_repo().list().await?)
    }

    #[instrument(skip(self, roles), fields(count = roles.len()))]
    pub async fn replace_all(&self, roles: Vec<PlatformRole>) -> ServiceResult<usize> {
        let roles: Vec<Role> = roles.into_iter().map(PlatformRole::into_role).collect();
        self.ctx
            .role_repo()
            .replace_all(&roles)
            .await
            .inspect_err(|e| error!(error = %e, "Bulk role sync failed"))?;
        Ok(roles.len())
    }
}
