//! Wire payloads of the platform's REST and gateway surfaces
//!
//! Only the fields the bot reads are declared; everything else is ignored.

use roster_core::traits::{PlatformMember, PlatformRole};
use roster_core::value_objects::{MemberId, Permissions, RoleId};
use serde::{Deserialize, Serialize};

// === User Payload ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

// === Member Payloads ===

/// Guild member object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPayload {
    pub user: UserPayload,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Present on gateway member events only
    #[serde(default)]
    pub guild_id: Option<String>,
}

impl MemberPayload {
    /// Name shown in the guild: nickname, then global name, then username
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .or(self.user.global_name.as_deref())
            .unwrap_or(&self.user.username)
    }
}

impl From<MemberPayload> for PlatformMember {
    fn from(payload: MemberPayload) -> Self {
        let display_name = payload.display_name().to_string();
        PlatformMember {
            user_id: MemberId::new(payload.user.id),
            display_name: Some(display_name),
            role_ids: payload.roles.into_iter().map(RoleId::new).collect(),
        }
    }
}

/// GUILD_MEMBER_REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberRemoveEvent {
    pub guild_id: String,
    pub user: UserPayload,
}

// === Role Payloads ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePayload {
    pub id: String,
    pub name: String,
    pub permissions: Permissions,
}

impl From<RolePayload> for PlatformRole {
    fn from(payload: RolePayload) -> Self {
        PlatformRole {
            id: RoleId::new(payload.id),
            name: payload.name,
            permissions: payload.permissions,
        }
    }
}

/// GUILD_ROLE_CREATE/GUILD_ROLE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleEvent {
    pub guild_id: String,
    pub role: RolePayload,
}

/// GUILD_ROLE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleDeleteEvent {
    pub guild_id: String,
    pub role_id: String,
}

// === Interaction Payloads ===

/// Interaction type for application commands
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Callback type: reply with a message
pub const CALLBACK_CHANNEL_MESSAGE: u8 = 4;

/// Message flag: only the invoker sees it
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionPayload {
    pub id: String,
    pub token: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Set when invoked inside a guild
    #[serde(default)]
    pub member: Option<MemberPayload>,
    /// Set when invoked in a direct message
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub data: Option<CommandData>,
}

impl InteractionPayload {
    pub fn invoker_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .map(|m| m.user.id.as_str())
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandData {
    /// String value of a named option
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_ref())
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Body of an interaction callback
#[derive(Debug, Clone, Serialize)]
pub struct InteractionCallback<'a> {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: CallbackData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackData<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl<'a> InteractionCallback<'a> {
    pub fn message(content: &'a str, ephemeral: bool) -> Self {
        Self {
            kind: CALLBACK_CHANNEL_MESSAGE,
            data: CallbackData {
                content,
                flags: ephemeral.then_some(FLAG_EPHEMERAL),
            },
        }
    }
}

// === Channel Payloads ===

/// Channel type: guild text channel
pub const CHANNEL_GUILD_TEXT: u8 = 0;

#[derive(Debug, Clone, Serialize)]
pub struct CreateChannelBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: String,
}
