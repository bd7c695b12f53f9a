//! Stand-in platform used when no bot credential is configured

use async_trait::async_trait;
use roster_core::traits::{
    NewChannel, PlatformClient, PlatformError, PlatformMember, PlatformResult, PlatformRole,
};
use roster_core::value_objects::{ChannelId, MemberId, RoleId};

/// Fails every call with `NotConfigured`, keeping the bot offline
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredPlatform {
    missing: &'static str,
}

impl UnconfiguredPlatform {
    pub fn new(missing: &'static str) -> Self {
        Self { missing }
    }

    fn err(&self) -> PlatformError {
        PlatformError::NotConfigured(self.missing)
    }
}

#[async_trait]
impl PlatformClient for UnconfiguredPlatform {
    async fn verify_credentials(&self) -> PlatformResult<String> {
        Err(self.err())
    }

    async fn fetch_member(&self, _user_id: &MemberId) -> PlatformResult<Option<PlatformMember>> {
        Err(self.err())
    }

    async fn list_members(&self) -> PlatformResult<Vec<PlatformMember>> {
        Err(self.err())
    }

    async fn list_roles(&self) -> PlatformResult<Vec<PlatformRole>> {
        Err(self.err())
    }

    async fn add_role(&self, _user_id: &MemberId, _role_id: &RoleId) -> PlatformResult<()> {
        Err(self.err())
    }

    async fn remove_role(&self, _user_id: &MemberId, _role_id: &RoleId) -> PlatformResult<()> {
        Err(self.err())
    }

    async fn create_channel(&self, _channel: &NewChannel) -> PlatformResult<ChannelId> {
        Err(self.err())
    }

    async fn reply(
        &self,
        _interaction_id: &str,
        _interaction_token: &str,
        _content: &str,
        _ephemeral: bool,
    ) -> PlatformResult<()> {
        Err(self.err())
    }
}
