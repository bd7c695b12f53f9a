//! Membership mirror
//!
//! Local copy of guild membership fed by platform events and bulk
//! snapshots. Event-facing writes log storage failures and carry on; the
//! next event or refresh repairs the row.

use roster_core::entities::Member;
use roster_core::traits::PlatformMember;
use roster_core::value_objects::MemberId;
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct MembershipMirror<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipMirror<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a member with its full role set
    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    pub async fn upsert(&self, member: PlatformMember) -> bool {
        let member = member.into_member();
        match self.ctx.member_repo().upsert(&member).await {
            Ok(()) => {
                debug!(roles = member.role_count(), "Member mirrored");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to mirror member");
                false
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &MemberId) {
        if let Err(e) = self.ctx.member_repo().delete(user_id).await {
            warn!(error = %e, "Failed to remove mirrored member");
        }
    }

    /// Mirrored member, `None` when absent or unreadable
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &MemberId) -> Option<Member> {
        match self.ctx.member_repo().find_by_id(user_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(error = %e, "Member lookup failed");
                None
            }
        }
    }

    /// Every mirrored member ordered by display name
    pub async fn list(&self) -> ServiceResult<Vec<Member>> {
        Ok(self.ctx.member_repo().list().await?)
    }

    /// Swap in a bulk snapshot, dropping members no longer present
    #[instrument(skip(self, members), fields(count = members.len()))]
    pub async fn replace_all(&self, members: Vec<PlatformMember>) -> ServiceResult<usize> {
        let members: Vec<Member> = members.into_iter().map(PlatformMember::into_member).collect();
        self.ctx
            .member_repo()
            .replace_all(&members)
            .await
            .inspect_err(|e| error!(error = %e, "Bulk member sync failed"))?;
        Ok(members.len())
    }

    pub async fn record_admin_snapshot(&self, user_id: &MemberId, is_admin: bool) {
        if let Err(e) = self
            .ctx
            .member_repo()
            .set_admin_snapshot(user_id, is_admin)
            .await
        {
            warn!(user_id = %user_id, error = %e, "Failed to store admin snapshot");
        }
    }
}
