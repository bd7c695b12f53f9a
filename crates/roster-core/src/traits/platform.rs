//! Chat platform port
//!
//! Outbound calls the bot and the birthday scheduler make against the
//! platform's REST surface. Implemented over HTTP in `roster-bot` and by a
//! recording double in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Member, Role};
use crate::error::DomainError;
use crate::value_objects::{ChannelId, MemberId, Permissions, RoleId};

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Platform call failures
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform rejected credentials")]
    Unauthorized,

    #[error("platform returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected payload: {0}")]
    Decode(String),

    #[error("platform client not configured: {0}")]
    NotConfigured(&'static str),
}

impl From<PlatformError> for DomainError {
    fn from(err: PlatformError) -> Self {
        DomainError::PlatformError(err.to_string())
    }
}

/// A guild member as the platform reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMember {
    pub user_id: MemberId,
    pub display_name: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
}

impl PlatformMember {
    pub fn new(
        user_id: impl Into<MemberId>,
        display_name: Option<&str>,
        role_ids: impl IntoIterator<Item = RoleId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.map(str::to_string),
            role_ids: role_ids.into_iter().collect(),
        }
    }

    /// Name to show, falling back to the raw id
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.user_id.as_str())
    }

    pub fn into_member(self) -> Member {
        Member::new(self.user_id, self.display_name, self.role_ids)
    }
}

/// A role as the platform reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRole {
    pub id: RoleId,
    pub name: String,
    pub permissions: Permissions,
}

impl PlatformRole {
    pub fn into_role(self) -> Role {
        Role::new(self.id, self.name, self.permissions)
    }
}

/// Text channel creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewChannel {
    pub name: String,
    /// Category to nest the channel under
    pub parent_id: Option<ChannelId>,
}

#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Check the bot credential; returns the bot account's name
    async fn verify_credentials(&self) -> PlatformResult<String>;

    /// Fetch one guild member; `None` when they are not in the guild
    async fn fetch_member(&self, user_id: &MemberId) -> PlatformResult<Option<PlatformMember>>;

    /// Fetch every guild member
    async fn list_members(&self) -> PlatformResult<Vec<PlatformMember>>;

    /// Fetch every guild role
    async fn list_roles(&self) -> PlatformResult<Vec<PlatformRole>>;

    async fn add_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()>;

    async fn remove_role(&self, user_id: &MemberId, role_id: &RoleId) -> PlatformResult<()>;

    /// Create a text channel; returns the new channel id
    async fn create_channel(&self, channel: &NewChannel) -> PlatformResult<ChannelId>;

    /// Answer a slash command invocation
    async fn reply(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        content: &str,
        ephemeral: bool,
    ) -> PlatformResult<()>;
}
