//! Bot lifecycle

mod bootstrap;
mod scheduler;

pub use bootstrap::{start, sync_all, BotHandle, SyncSummary};
pub use scheduler::{spawn_birthday_sweeps, spawn_mirror_refresh};
