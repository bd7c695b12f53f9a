//! # roster-bot
//!
//! Chat platform side of the roster: a REST client for the platform API, an
//! ordered dispatcher for inbound platform events, bulk sync at startup and
//! on an interval, and the recurring birthday sweep.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod runtime;

pub use client::{platform_client, DiscordClient, UnconfiguredPlatform};
pub use dispatch::{handle_event, EventDispatcher, EventSender};
pub use error::{BotError, BotResult};
pub use events::decode_dispatch;
pub use runtime::{start, sync_all, BotHandle, SyncSummary};
