//! The background coordinator.
//!
//! A long-lived object owned by the daemon, woken by discrete events: alarm
//! ticks, routed messages, command dispatch, notification button presses.
//! Handlers return promptly; there are no long-running loops here. The store
//! is the only shared mutable resource and is never locked across handlers:
//! every read may be stale and every write may clobber a concurrent one.

pub mod alarms;
pub mod checks;
pub mod notify;
pub mod surface;

pub use alarms::Alarm;
pub use notify::{DesktopNotifier, NotificationRequest, Notifier, RecordingNotifier};
pub use surface::{RecordingOpener, ShellOpener, TabOpener};

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::protocol::ContentPush;
use crate::store::SharedStore;

/// Capacity of the overlay-push channel; slow subscribers lag and drop.
const PUSH_CHANNEL_CAPACITY: usize = 32;

pub struct Coordinator {
    store: SharedStore,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    tabs: Arc<dyn TabOpener>,
    pushes: broadcast::Sender<ContentPush>,
    alarms_registered: AtomicBool,
}

impl Coordinator {
    pub fn new(
        store: SharedStore,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        tabs: Arc<dyn TabOpener>,
    ) -> Self {
        let (pushes, _) = broadcast::channel(PUSH_CHANNEL_CAPACITY);
        Self {
            store,
            clock,
            notifier,
            tabs,
            pushes,
            alarms_registered: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &dyn crate::store::KvStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn tabs(&self) -> &dyn TabOpener {
        self.tabs.as_ref()
    }

    /// Subscribe to overlay pushes (the content-surface channel).
    pub fn subscribe_pushes(&self) -> broadcast::Receiver<ContentPush> {
        self.pushes.subscribe()
    }

    /// Push an overlay trigger to whichever surfaces are listening. No
    /// subscribers is not an error; the push is simply dropped.
    pub fn push(&self, push: ContentPush) {
        let _ = self.pushes.send(push);
    }

    /// Dispatch a fired alarm to its check handler.
    pub fn handle_alarm(&self, alarm: Alarm) {
        tracing::debug!(alarm = alarm.name(), "alarm fired");
        match alarm {
            Alarm::FlowCheck => self.run_flow_check(),
            Alarm::TabSnoozeCheck => self.run_tab_snooze_check(),
            Alarm::WeeklyReviewCheck => self.run_weekly_review_check(),
        }
    }
}
