//! Overlay controller and idle tracker for a content surface.
//!
//! The controller enforces at-most-one mounted instance per overlay id; the
//! idle tracker is a two-state debounce (counting/prompting) whose deadline
//! is re-armed by every activity event.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tokio::sync::mpsc;

use crate::clock::Clock;
use crate::protocol::ContentPush;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayId {
    QuickCapture,
    FlowCheck,
    CategorizeSite,
    CaptureSelection,
    TruthBadge,
    TabIndicator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    /// Panel visibility; only meaningful for the flow-check widget.
    pub visible: bool,
    /// Push payload: the domain being categorized, the selected text, …
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// A fresh overlay was mounted.
    Mounted,
    /// The overlay id is already mounted; the request was a no-op.
    Ignored,
    /// The flow-check widget toggled its panel instead of remounting.
    PanelToggled(bool),
    /// The truth badge replaced a previous instance.
    Remounted,
}

#[derive(Debug, Default)]
pub struct OverlayController {
    open: HashMap<OverlayId, Overlay>,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, id: OverlayId, context: Option<String>) -> ShowOutcome {
        match id {
            // Repeat invocation toggles the panel rather than remounting.
            OverlayId::FlowCheck => {
                if let Some(overlay) = self.open.get_mut(&id) {
                    overlay.visible = !overlay.visible;
                    ShowOutcome::PanelToggled(overlay.visible)
                } else {
                    // The widget mounts with its panel closed.
                    self.open.insert(id, Overlay { id, visible: false, context });
                    ShowOutcome::Mounted
                }
            }
            // The badge always replaces an existing instance.
            OverlayId::TruthBadge => {
                let existed = self
                    .open
                    .insert(id, Overlay { id, visible: true, context })
                    .is_some();
                if existed {
                    ShowOutcome::Remounted
                } else {
                    ShowOutcome::Mounted
                }
            }
            _ if self.open.contains_key(&id) => ShowOutcome::Ignored,
            _ => {
                self.open.insert(id, Overlay { id, visible: true, context });
                ShowOutcome::Mounted
            }
        }
    }

    /// Mount the overlay a push asks for.
    pub fn apply(&mut self, push: &ContentPush) -> ShowOutcome {
        match push {
            ContentPush::ShowQuickCapture => self.show(OverlayId::QuickCapture, None),
            ContentPush::ShowFlowCheck => self.show(OverlayId::FlowCheck, None),
            ContentPush::ShowTruthBadge { domain, .. } => {
                self.show(OverlayId::TruthBadge, Some(domain.clone()))
            }
            ContentPush::CategorizeSite { domain } => {
                self.show(OverlayId::CategorizeSite, Some(domain.clone()))
            }
            ContentPush::CaptureSelection { text } => {
                self.show(OverlayId::CaptureSelection, Some(text.clone()))
            }
        }
    }

    pub fn close(&mut self, id: OverlayId) -> bool {
        self.open.remove(&id).is_some()
    }

    pub fn is_open(&self, id: OverlayId) -> bool {
        self.open.contains_key(&id)
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.open.get(&id)
    }
}

// ============================================================================
// Idle tracker
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    Counting,
    Prompting,
}

/// Triage choices offered by the idle prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageChoice {
    /// Under two minutes: do it and move on.
    DoNow,
    /// Snooze the tab until tomorrow morning and close it.
    SnoozeTomorrow,
    /// Close without persisting anything.
    Trash,
}

pub struct IdleTracker {
    threshold: Duration,
    deadline: DateTime<Utc>,
    state: IdleState,
}

impl IdleTracker {
    pub fn new(threshold_minutes: u64, now: DateTime<Utc>) -> Self {
        let threshold = Duration::minutes(threshold_minutes as i64);
        Self { threshold, deadline: now + threshold, state: IdleState::Counting }
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Any activity re-arms the deadline. Returns true when the activity
    /// dismissed a visible prompt.
    pub fn on_activity(&mut self, now: DateTime<Utc>) -> bool {
        let was_prompting = self.state == IdleState::Prompting;
        self.state = IdleState::Counting;
        self.deadline = now + self.threshold;
        was_prompting
    }

    /// Check the deadline; returns true on the counting→prompting
    /// transition, exactly once per idle period.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == IdleState::Counting && now >= self.deadline {
            self.state = IdleState::Prompting;
            return true;
        }
        false
    }
}

/// Wake time for the snooze-until-tomorrow choice: 09:00 tomorrow.
pub fn snooze_until_tomorrow(clock: &dyn Clock) -> DateTime<Utc> {
    let today = clock.today();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let morning = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    clock.from_local(tomorrow.and_time(morning))
}

/// Events emitted by the async idle driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleEvent {
    /// The deadline passed; show the triage indicator.
    Prompt,
    /// Activity arrived while prompting; remove the indicator.
    Dismissed,
}

/// Resettable-timer driver around `IdleTracker`: sleeps toward the current
/// deadline and drains activity events, re-arming on each one. Ends when the
/// activity channel closes.
pub async fn drive_idle_tracker(
    mut tracker: IdleTracker,
    clock: std::sync::Arc<dyn Clock>,
    mut activity: mpsc::Receiver<()>,
    events: mpsc::Sender<IdleEvent>,
) {
    loop {
        match tracker.state() {
            IdleState::Prompting => match activity.recv().await {
                Some(()) => {
                    if tracker.on_activity(clock.now()) {
                        let _ = events.send(IdleEvent::Dismissed).await;
                    }
                }
                None => break,
            },
            IdleState::Counting => {
                let wait = (tracker.deadline() - clock.now())
                    .to_std()
                    .unwrap_or_default();
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        if tracker.poll(clock.now()) {
                            let _ = events.send(IdleEvent::Prompt).await;
                        }
                    }
                    message = activity.recv() => match message {
                        Some(()) => {
                            tracker.on_activity(clock.now());
                        }
                        None => break,
                    },
                }
            }
        }
    }
}
