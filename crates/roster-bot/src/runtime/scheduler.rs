//! Periodic background tasks

use std::sync::Arc;
use std::time::Duration;

use roster_core::events::PlatformEvent;
use roster_service::{BirthdayService, ServiceContext};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::dispatch::EventSender;

const MIN_PERIOD: Duration = Duration::from_secs(1);
/// One year; keeps `Instant` arithmetic in range
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn clamp(period: Duration) -> Duration {
    period.clamp(MIN_PERIOD, MAX_PERIOD)
}

/// Run the birthday sweep now and then every `period`
pub fn spawn_birthday_sweeps(ctx: Arc<ServiceContext>, period: Duration) -> JoinHandle<()> {
    let period = clamp(period);
    info!(period_secs = period.as_secs(), "Birthday sweeps scheduled");

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now(), period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            // The sweep logs its own report
            BirthdayService::new(&ctx).sweep().await;
        }
    })
}

/// Queue a full resync every `period`, starting one period from now
///
/// The resync runs on the dispatcher, so it never interleaves with member
/// or role events. Stops once the queue is closed.
pub fn spawn_mirror_refresh(sender: EventSender, period: Duration) -> JoinHandle<()> {
    let period = clamp(period);

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if sender.send(PlatformEvent::Resync).await.is_err() {
                warn!("Event queue closed, stopping mirror refresh");
                break;
            }
        }
    })
}
