//! The three periodic checks.
//!
//! Each firing re-reads its guards from storage and silently no-ops when any
//! guard fails; background checks never surface errors to the user.

use tracing::{debug, warn};

use crate::constants::{anchors, notifications};
use crate::models::{FlowThermometer, Settings, TabSnoozer, WeeklyReview};
use crate::store;

use super::{Coordinator, NotificationRequest};

impl Coordinator {
    /// Flow check: prompt for a flow-state reading unless the feature is
    /// disabled or paused. The pause expires lazily; an elapsed
    /// `paused_until` makes the next firing active again.
    pub(crate) fn run_flow_check(&self) {
        let doc: FlowThermometer = store::load(self.store());
        if doc.is_paused(self.clock().now()) {
            debug!("flow check paused");
            return;
        }

        let settings: Settings = store::load(self.store());
        if !settings.utilities.flow_thermometer.enabled {
            return;
        }

        self.notifier().notify(NotificationRequest {
            id: notifications::FLOW_CHECK.to_string(),
            title: "Flow Check 🌡️".to_string(),
            message: "How is your current task going? Rate your flow state.".to_string(),
            buttons: vec!["Check In".to_string(), "Pause 30min".to_string()],
            priority: 1,
        });
    }

    /// Tab snooze check: wake every tab whose time has come, in a single
    /// get→mutate→set cycle on the document. A concurrent snooze from
    /// another surface can lose against this write; accepted.
    pub(crate) fn run_tab_snooze_check(&self) {
        let settings: Settings = store::load(self.store());
        if !settings.utilities.tab_snoozer.enabled {
            return;
        }

        let now = self.clock().now();
        let mut doc: TabSnoozer = store::load(self.store());
        let woken = doc.wake_due(now);
        if woken.is_empty() {
            return;
        }

        for tab in &woken {
            self.tabs().open_url(&tab.url);
        }
        if let Err(err) = store::save(self.store(), &doc) {
            warn!(%err, "failed to persist woken tabs");
        }

        self.notifier().notify(NotificationRequest::basic(
            notifications::TAB_AWAKE,
            "Tabs Awakened 😴→👀",
            &format!("{} snoozed tab(s) have been opened.", woken.len()),
            1,
        ));
    }

    /// Weekly review check: the poll is coarse, so the schedule matches an
    /// hour-wide window and a once-per-day stamp keeps the prompt to exactly
    /// one per scheduled day.
    pub(crate) fn run_weekly_review_check(&self) {
        let settings: Settings = store::load(self.store());
        if !settings.utilities.weekly_review.enabled {
            return;
        }

        let mut doc: WeeklyReview = store::load(self.store());
        if !doc.schedule.window_matches(self.clock().local_now()) {
            return;
        }

        let today = self.clock().today();
        if doc.last_prompt_date == Some(today) {
            return;
        }

        // Stamp before prompting; if the stamp cannot be persisted, skip the
        // prompt rather than risk re-prompting every firing this hour.
        doc.last_prompt_date = Some(today);
        if let Err(err) = store::save(self.store(), &doc) {
            warn!(%err, "failed to stamp weekly review prompt");
            return;
        }

        self.tabs().open_dashboard(Some(anchors::WEEKLY_REVIEW));
        self.notifier().notify(NotificationRequest::basic(
            notifications::WEEKLY_REVIEW,
            "Weekly Review Time 📋",
            "Time for your weekly reflection. Take 15 minutes to review your week.",
            2,
        ));
    }
}
