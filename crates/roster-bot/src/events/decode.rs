//! Gateway dispatch decoding
//!
//! Turns a raw dispatch frame (`t` and `d`) into a [`PlatformEvent`]. A
//! transport adapter calls this and pushes the result into the bot's queue.

use roster_core::events::{BirthdayCommand, PlatformEvent};
use roster_core::value_objects::{MemberId, RoleId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use super::event_types::DispatchEventType;
use super::payloads::{
    GuildMemberRemoveEvent, GuildRoleDeleteEvent, GuildRoleEvent, InteractionPayload,
    MemberPayload, INTERACTION_APPLICATION_COMMAND,
};
use crate::error::{BotError, BotResult};

/// Slash command that registers a birthday
pub const BIRTHDAY_COMMAND: &str = "birthday";

fn parse<T: DeserializeOwned>(ty: DispatchEventType, data: Value) -> BotResult<T> {
    serde_json::from_value(data).map_err(|e| BotError::invalid_payload(ty.as_str(), e))
}

fn other_guild(guild_id: Option<&str>, expected: Option<&str>) -> bool {
    matches!((guild_id, expected), (Some(got), Some(want)) if got != want)
}

/// Decode one dispatch frame
///
/// Returns `Ok(None)` for events the bot ignores: unknown names, other
/// guilds, non-command interactions and other commands.
pub fn decode_dispatch(
    event_name: &str,
    data: Value,
    guild_id: Option<&str>,
) -> BotResult<Option<PlatformEvent>> {
    let Ok(ty) = event_name.parse::<DispatchEventType>() else {
        trace!(event = event_name, "Ignoring dispatch");
        return Ok(None);
    };

    let event = match ty {
        DispatchEventType::GuildMemberAdd | DispatchEventType::GuildMemberUpdate => {
            let member: MemberPayload = parse(ty, data)?;
            if other_guild(member.guild_id.as_deref(), guild_id) {
                return Ok(None);
            }
            let member = member.into();
            if ty == DispatchEventType::GuildMemberAdd {
                PlatformEvent::MemberAdded(member)
            } else {
                PlatformEvent::MemberUpdated(member)
            }
        }
        DispatchEventType::GuildMemberRemove => {
            let removed: GuildMemberRemoveEvent = parse(ty, data)?;
            if other_guild(Some(&removed.guild_id), guild_id) {
                return Ok(None);
            }
            PlatformEvent::MemberRemoved {
                user_id: MemberId::new(removed.user.id),
            }
        }
        DispatchEventType::GuildRoleCreate | DispatchEventType::GuildRoleUpdate => {
            let event: GuildRoleEvent = parse(ty, data)?;
            if other_guild(Some(&event.guild_id), guild_id) {
                return Ok(None);
            }
            let role = event.role.into();
            if ty == DispatchEventType::GuildRoleCreate {
                PlatformEvent::RoleCreated(role)
            } else {
                PlatformEvent::RoleUpdated(role)
            }
        }
        DispatchEventType::GuildRoleDelete => {
            let event: GuildRoleDeleteEvent = parse(ty, data)?;
            if other_guild(Some(&event.guild_id), guild_id) {
                return Ok(None);
            }
            PlatformEvent::RoleDeleted {
                role_id: RoleId::new(event.role_id),
            }
        }
        DispatchEventType::InteractionCreate => {
            let interaction: InteractionPayload = parse(ty, data)?;
            return Ok(birthday_command(interaction, guild_id));
        }
    };

    Ok(Some(event))
}

fn birthday_command(
    interaction: InteractionPayload,
    guild_id: Option<&str>,
) -> Option<PlatformEvent> {
    if interaction.kind != INTERACTION_APPLICATION_COMMAND
        || other_guild(interaction.guild_id.as_deref(), guild_id)
    {
        return None;
    }
    let data = interaction.data.as_ref()?;
    if data.name != BIRTHDAY_COMMAND {
        return None;
    }

    let invoker_id = MemberId::new(interaction.invoker_id()?);
    // Missing options reach the handler as blanks and are rejected there
    let target_id = MemberId::new(data.option("user").unwrap_or_default());
    let date = data.option("date").unwrap_or_default().to_string();

    Some(PlatformEvent::BirthdayCommand(BirthdayCommand {
        interaction_id: interaction.id,
        interaction_token: interaction.token,
        invoker_id,
        target_id,
        date,
    }))
}
