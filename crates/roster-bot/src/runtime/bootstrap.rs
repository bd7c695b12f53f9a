//! Bot startup: credential check, bulk sync, background tasks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use roster_common::AppConfig;
use roster_core::events::PlatformEvent;
use roster_service::{MembershipMirror, PermissionResolver, RoleRegistry, ServiceContext};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info, instrument, warn};

use super::scheduler::{spawn_birthday_sweeps, spawn_mirror_refresh};
use crate::dispatch::{channel, EventDispatcher, EventSender};
use crate::error::{BotError, BotResult};

/// Counts from one bulk sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub roles: usize,
    pub members: usize,
}

/// Handle held by the web layer to observe and feed the bot
#[derive(Debug, Clone)]
pub struct BotHandle {
    sender: Option<EventSender>,
    online: Arc<AtomicBool>,
}

impl BotHandle {
    /// Handle of a bot that never came up
    pub fn offline() -> Self {
        Self {
            sender: None,
            online: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Queue an event for the dispatcher
    ///
    /// Returns `false` when the bot is offline or the queue is full or closed.
    pub fn submit(&self, event: PlatformEvent) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(event_type = event.event_type(), "Event queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.online.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Queue an event, waiting for capacity
    ///
    /// # Errors
    /// Returns `BotError::QueueClosed` when the bot is offline or the
    /// dispatcher has stopped
    pub async fn dispatch(&self, event: PlatformEvent) -> BotResult<()> {
        let sender = self.sender.as_ref().ok_or(BotError::QueueClosed)?;
        sender.send(event).await.map_err(|_| {
            self.online.store(false, Ordering::SeqCst);
            BotError::QueueClosed
        })
    }
}

/// Fetch roles then members into the registry and the mirror, then refresh
/// every member's admin snapshot
///
/// # Errors
/// Returns the first platform or storage failure
#[instrument(skip(ctx))]
pub async fn sync_all(ctx: &ServiceContext) -> BotResult<SyncSummary> {
    let roles = ctx.platform().list_roles().await?;
    let roles = RoleRegistry::new(ctx).replace_all(roles).await?;

    let members = ctx.platform().list_members().await?;
    let member_ids: Vec<_> = members.iter().map(|m| m.user_id.clone()).collect();
    let members = MembershipMirror::new(ctx).replace_all(members).await?;

    let resolver = PermissionResolver::new(ctx);
    for user_id in &member_ids {
        resolver.refresh_snapshot(user_id).await;
    }

    info!(roles, members, "Bulk sync complete");
    Ok(SyncSummary { roles, members })
}

/// Bring the bot up
///
/// A rejected credential leaves the bot offline; the web surface keeps
/// serving the last mirrored data. A failed initial sync is logged and the
/// bot still starts, relying on events and the periodic refresh.
pub async fn start(ctx: Arc<ServiceContext>, config: &AppConfig) -> BotHandle {
    match ctx.platform().verify_credentials().await {
        Ok(name) => info!(bot = %name, "Bot credential verified"),
        Err(e) => {
            error!(error = %e, "Bot credential rejected, staying offline");
            return BotHandle::offline();
        }
    }

    if let Err(e) = sync_all(&ctx).await {
        error!(error = %e, "Initial sync failed");
    }

    let (sender, receiver) = channel(config.bot.event_queue_capacity);
    let dispatcher = EventDispatcher::new(ctx.clone(), receiver);
    let online = dispatcher.running();
    online.store(true, Ordering::SeqCst);
    dispatcher.start();

    spawn_birthday_sweeps(
        ctx.clone(),
        Duration::from_secs(config.birthday.sweep_interval_secs),
    );
    spawn_mirror_refresh(
        sender.clone(),
        Duration::from_secs(config.sync.refresh_interval_secs),
    );

    BotHandle {
        sender: Some(sender),
        online,
    }
}
