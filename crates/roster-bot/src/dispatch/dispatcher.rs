//! Event dispatcher
//!
//! Consumes platform events from the bounded queue one at a time, in arrival
//! order, and applies each to the mirror, the registry, or the birthday
//! store before taking the next.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use roster_core::events::{BirthdayCommand, PlatformEvent};
use roster_service::{
    AutoRoleService, BirthdayService, MembershipMirror, PermissionResolver, RoleRegistry,
    ServiceContext,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::runtime::sync_all;

/// Sending half of the event queue
pub type EventSender = mpsc::Sender<PlatformEvent>;

/// Create the bounded event queue
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<PlatformEvent>) {
    mpsc::channel(capacity.max(1))
}

/// Single consumer of the event queue
pub struct EventDispatcher {
    ctx: Arc<ServiceContext>,
    receiver: mpsc::Receiver<PlatformEvent>,
    running: Arc<AtomicBool>,
    processed: Arc<AtomicU64>,
}

impl EventDispatcher {
    pub fn new(ctx: Arc<ServiceContext>, receiver: mpsc::Receiver<PlatformEvent>) -> Self {
        Self {
            ctx,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Flag that is set while the loop runs
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Counter of events handled so far
    pub fn processed(&self) -> Arc<AtomicU64> {
        self.processed.clone()
    }

    /// Spawn the dispatch loop
    ///
    /// The loop ends once every sender has been dropped and the queue drained.
    pub fn start(self) -> JoinHandle<()> {
        let handle = tokio::spawn(self.run());
        info!("Event dispatcher started");
        handle
    }

    async fn run(mut self) {
        self.running.store(true, Ordering::SeqCst);

        while let Some(event) = self.receiver.recv().await {
            handle_event(&self.ctx, event).await;
            self.processed.fetch_add(1, Ordering::Relaxed);
        }

        self.running.store(false, Ordering::SeqCst);
        info!(
            processed = self.processed.load(Ordering::Relaxed),
            "Event dispatcher loop ended"
        );
    }
}

/// Apply one event to completion
///
/// Failures are logged inside the services; nothing here propagates.
#[instrument(skip(ctx, event), fields(event_type = event.event_type()))]
pub async fn handle_event(ctx: &ServiceContext, event: PlatformEvent) {
    let mirror = MembershipMirror::new(ctx);
    let registry = RoleRegistry::new(ctx);

    match event {
        PlatformEvent::MemberAdded(member) => {
            let user_id = member.user_id.clone();
            if mirror.upsert(member).await {
                PermissionResolver::new(ctx).refresh_snapshot(&user_id).await;
            }
            AutoRoleService::new(ctx).assign(&user_id).await;
        }
        PlatformEvent::MemberUpdated(member) => {
            let user_id = member.user_id.clone();
            if mirror.upsert(member).await {
                PermissionResolver::new(ctx).refresh_snapshot(&user_id).await;
            }
        }
        PlatformEvent::MemberRemoved { user_id } => mirror.remove(&user_id).await,
        PlatformEvent::RoleCreated(role) | PlatformEvent::RoleUpdated(role) => {
            registry.upsert(role).await;
        }
        PlatformEvent::RoleDeleted { role_id } => registry.remove(&role_id).await,
        PlatformEvent::BirthdayCommand(command) => birthday_command(ctx, command).await,
        PlatformEvent::Resync => {
            if let Err(e) = sync_all(ctx).await {
                error!(error = %e, "Mirror refresh failed");
            }
        }
    }
}

async fn birthday_command(ctx: &ServiceContext, command: BirthdayCommand) {
    let content = match BirthdayService::new(ctx)
        .register(&command.invoker_id, &command.target_id, &command.date)
        .await
    {
        Ok(entry) => format!("Registered <@{}>'s birthday as {}.", entry.user_id, entry.date),
        Err(e) => {
            debug!(error = %e, "Birthday command rejected");
            e.user_message()
        }
    };

    if let Err(e) = ctx
        .platform()
        .reply(&command.interaction_id, &command.interaction_token, &content, true)
        .await
    {
        warn!(interaction_id = %command.interaction_id, error = %e, "Failed to answer birthday command");
    }
}
