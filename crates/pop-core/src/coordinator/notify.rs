//! System notifications and button-press routing.

use parking_lot::Mutex;
use tracing::debug;

use crate::constants::{anchors, notifications, FLOW_PAUSE_MINUTES};
use crate::models::FlowThermometer;
use crate::store;

use super::Coordinator;

/// An ephemeral notification. The surface guarantees at most one visible
/// notification per id; redelivery with the same id replaces the first.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub priority: u8,
}

impl NotificationRequest {
    pub fn basic(id: &str, title: &str, message: &str, priority: u8) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            buttons: Vec::new(),
            priority,
        }
    }
}

/// Fire-and-forget delivery. Denied permission or a missing notification
/// surface makes every call a no-op; no caller may depend on delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, request: NotificationRequest);
    fn dismiss(&self, id: &str);
}

/// Production notifier: hands the notification to the desktop via
/// `notify-send` and swallows every failure.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, request: NotificationRequest) {
        let urgency = if request.priority >= 2 { "critical" } else { "normal" };
        let result = std::process::Command::new("notify-send")
            .arg("--app-name=pop")
            .arg(format!("--urgency={urgency}"))
            .arg(&request.title)
            .arg(&request.message)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        if let Err(err) = result {
            debug!(id = %request.id, %err, "notification delivery unavailable, ignoring");
        }
    }

    fn dismiss(&self, _id: &str) {
        // The desktop surface offers no programmatic dismissal; notifications
        // time out on their own.
    }
}

/// Test double that records deliveries and dismissals.
#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<NotificationRequest>>,
    pub dismissed: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_ids(&self) -> Vec<String> {
        self.delivered.lock().iter().map(|n| n.id.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, request: NotificationRequest) {
        self.delivered.lock().push(request);
    }

    fn dismiss(&self, id: &str) {
        self.dismissed.lock().push(id.to_string());
    }
}

impl Coordinator {
    /// Route a notification button press back into application state, then
    /// dismiss the notification unconditionally. Unknown ids are ignored.
    pub fn handle_notification_action(&self, id: &str, button_index: usize) {
        if id == notifications::FLOW_CHECK {
            if button_index == 0 {
                self.tabs().open_dashboard(Some(anchors::FLOW_THERMOMETER));
            } else {
                self.pause_flow_checks(FLOW_PAUSE_MINUTES);
            }
        }
        self.notifier().dismiss(id);
    }

    /// Pause flow check-ins; the pause is data, re-checked on each firing,
    /// not a cancelled timer.
    pub fn pause_flow_checks(&self, minutes: i64) {
        let now = self.clock().now();
        let result = store::update::<FlowThermometer, _>(self.store(), |doc| {
            doc.pause_for(minutes, now);
        });
        if let Err(err) = result {
            tracing::warn!(%err, "failed to persist flow pause");
        }
    }
}
