//! Platform dispatch events
//!
//! Wire payloads and their decoding into domain [`PlatformEvent`]s.
//!
//! [`PlatformEvent`]: roster_core::PlatformEvent

mod decode;
mod event_types;
mod payloads;

pub use decode::{decode_dispatch, BIRTHDAY_COMMAND};
pub use event_types::{DispatchEventType, UnhandledEvent};
pub use payloads::{
    CallbackData, ChannelPayload, CommandData, CommandOption, CreateChannelBody,
    GuildMemberRemoveEvent, GuildRoleDeleteEvent, GuildRoleEvent, InteractionCallback,
    InteractionPayload, MemberPayload, RolePayload, UserPayload, CHANNEL_GUILD_TEXT,
};
