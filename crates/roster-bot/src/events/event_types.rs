//! Dispatch event names the bot consumes
//!
//! These are the names found in the `t` field of gateway dispatch frames.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchEventType {
    // Member events
    /// User joined guild
    GuildMemberAdd,
    /// Member updated (roles, nickname)
    GuildMemberUpdate,
    /// User left guild
    GuildMemberRemove,

    // Role events
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,

    /// Slash command invocation
    InteractionCreate,
}

impl DispatchEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            Self::GuildRoleCreate => "GUILD_ROLE_CREATE",
            Self::GuildRoleUpdate => "GUILD_ROLE_UPDATE",
            Self::GuildRoleDelete => "GUILD_ROLE_DELETE",
            Self::InteractionCreate => "INTERACTION_CREATE",
        }
    }
}

impl fmt::Display for DispatchEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any other dispatch name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhandledEvent(pub String);

impl FromStr for DispatchEventType {
    type Err = UnhandledEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GUILD_MEMBER_ADD" => Ok(Self::GuildMemberAdd),
            "GUILD_MEMBER_UPDATE" => Ok(Self::GuildMemberUpdate),
            "GUILD_MEMBER_REMOVE" => Ok(Self::GuildMemberRemove),
            "GUILD_ROLE_CREATE" => Ok(Self::GuildRoleCreate),
            "GUILD_ROLE_UPDATE" => Ok(Self::GuildRoleUpdate),
            "GUILD_ROLE_DELETE" => Ok(Self::GuildRoleDelete),
            "INTERACTION_CREATE" => Ok(Self::InteractionCreate),
            other => Err(UnhandledEvent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for ty in [
            DispatchEventType::GuildMemberAdd,
            DispatchEventType::GuildRoleDelete,
            DispatchEventType::InteractionCreate,
        ] {
            assert_eq!(ty.as_str().parse::<DispatchEventType>().unwrap(), ty);
        }
        assert!("TYPING_START".parse::<DispatchEventType>().is_err());
    }
}
