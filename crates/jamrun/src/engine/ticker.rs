//! Scoring loop.
//!
//! One [`Ticker`] exists per Playing stint. It is started when the game enters
//! Playing and aborted when it leaves; every tick carries the stint number so
//! a tick already queued when the stint ended is recognized and dropped.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::Event;

pub(crate) struct Ticker {
    stint: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking every `period`; the first tick comes one full period from now
    pub(crate) fn start(stint: u64, period: Duration, events: WeakUnboundedSender<Event>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(events) = events.upgrade() else {
                    break;
                };
                if events.send(Event::Tick { stint }).is_err() {
                    break;
                }
            }
            debug!("Ticker for stint {} exited", stint);
        });

        debug!("Ticker started for stint {} ({:?})", stint, period);
        Self { stint, handle }
    }

    pub(crate) fn stint(&self) -> u64 {
        self.stint
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
