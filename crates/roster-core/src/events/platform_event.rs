//! Platform events - pushed by the chat platform's gateway
//!
//! Whatever transport adapter is attached decodes its wire frames into these
//! and feeds them to the bot's dispatcher queue. Every event is handled to
//! completion before the next one starts.

use serde::{Deserialize, Serialize};

use crate::traits::{PlatformMember, PlatformRole};
use crate::value_objects::{MemberId, RoleId};

/// All platform events the bot reacts to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformEvent {
    // =========================================================================
    // Member Events
    // =========================================================================
    MemberAdded(PlatformMember),
    MemberUpdated(PlatformMember),
    MemberRemoved { user_id: MemberId },

    // =========================================================================
    // Role Events
    // =========================================================================
    RoleCreated(PlatformRole),
    RoleUpdated(PlatformRole),
    RoleDeleted { role_id: RoleId },

    // =========================================================================
    // Commands
    // =========================================================================
    BirthdayCommand(BirthdayCommand),

    // =========================================================================
    // Maintenance
    // =========================================================================
    /// Re-fetch every role and member from the platform; queued behind the
    /// events that arrived before it
    Resync,
}

impl PlatformEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MemberAdded(_) => "MEMBER_ADDED",
            Self::MemberUpdated(_) => "MEMBER_UPDATED",
            Self::MemberRemoved { .. } => "MEMBER_REMOVED",
            Self::RoleCreated(_) => "ROLE_CREATED",
            Self::RoleUpdated(_) => "ROLE_UPDATED",
            Self::RoleDeleted { .. } => "ROLE_DELETED",
            Self::BirthdayCommand(_) => "BIRTHDAY_COMMAND",
            Self::Resync => "RESYNC",
        }
    }
}

/// `/birthday user date` slash command invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayCommand {
    pub interaction_id: String,
    pub interaction_token: String,
    pub invoker_id: MemberId,
    pub target_id: MemberId,
    /// Raw text; validated by the handler
    pub date: String,
}
