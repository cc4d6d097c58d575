//! Wire protocol between foreground surfaces and the daemon.
//!
//! Newline-delimited JSON over the Unix socket: one `Request` per line in,
//! one `Response` per line out. Actions are a closed enum tagged by the
//! `action` field, so the router's dispatch is an exhaustive `match` rather
//! than a string switch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::coordinator::Alarm;
use crate::models::{SiteCategory, ThoughtKind};

/// Request from a foreground surface to the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub action: MessageAction,
}

/// Response from the daemon to a foreground surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl Response {
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    pub fn error(id: u64, code: &str, message: &str) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorInfo { code: code.to_string(), message: message.to_string() }),
        }
    }
}

/// One-shot message actions. Every handler is idempotent and assumes no
/// ordering relative to other messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MessageAction {
    #[serde(rename_all = "camelCase")]
    SaveThought {
        text: String,
        #[serde(rename = "type")]
        kind: ThoughtKind,
    },
    GetSettings,
    #[serde(rename_all = "camelCase")]
    CategorizeSite { domain: String, category: SiteCategory },
    #[serde(rename_all = "camelCase")]
    LogTime { category: SiteCategory, minutes: f64 },
    #[serde(rename_all = "camelCase")]
    OpenDashboard {
        #[serde(default)]
        hash: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SnoozeTab {
        url: String,
        title: String,
        wake_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    SaveLink {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
    /// Context-menu text capture: forwards the selection to the overlay
    /// surface for tagging.
    #[serde(rename_all = "camelCase")]
    CaptureSelection { text: String },
    /// Notification button routing. The notification surface cannot deliver
    /// button presses itself, so they come back through the router.
    #[serde(rename_all = "camelCase")]
    NotifyAction { id: String, button_index: usize },
    /// Fire a periodic check now, with its normal guards.
    #[serde(rename_all = "camelCase")]
    CheckNow { alarm: Alarm },
    /// Global-shortcut dispatch. `domain` is the invoking surface's site,
    /// used by the time-log command.
    #[serde(rename_all = "camelCase")]
    Command {
        command: Command,
        #[serde(default)]
        domain: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ExportCsv { key: String },
    #[serde(rename_all = "camelCase")]
    ImportCsv {
        key: String,
        csv: String,
        #[serde(default)]
        merge: bool,
    },
    /// Upgrade this connection to an overlay-push stream.
    SubscribeOverlays,
    Status,
    Shutdown,
}

/// Pushes from the daemon to a subscribed overlay surface. No response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ContentPush {
    ShowQuickCapture,
    ShowFlowCheck,
    #[serde(rename_all = "camelCase")]
    ShowTruthBadge { category: SiteCategory, domain: String },
    /// Canonical spelling. The original shipped this push all-lowercase
    /// (`categorizesite`), inconsistent with the storage-mutating action;
    /// the legacy spelling is accepted on decode only.
    #[serde(rename_all = "camelCase", alias = "categorizesite")]
    CategorizeSite { domain: String },
    #[serde(rename_all = "camelCase")]
    CaptureSelection { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_with_action_tag() {
        let json = r#"{"id":3,"action":"saveThought","text":"buy milk","type":"actionable"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.action,
            MessageAction::SaveThought { text: "buy milk".into(), kind: ThoughtKind::Actionable }
        );

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["action"], "saveThought");
        assert_eq!(encoded["type"], "actionable");
    }

    #[test]
    fn legacy_categorizesite_spelling_still_decodes() {
        let push: ContentPush =
            serde_json::from_str(r#"{"action":"categorizesite","domain":"mail.example"}"#).unwrap();
        assert_eq!(push, ContentPush::CategorizeSite { domain: "mail.example".into() });

        // Encoding always uses the canonical spelling.
        let encoded = serde_json::to_value(&push).unwrap();
        assert_eq!(encoded["action"], "categorizeSite");
    }

    #[test]
    fn unknown_action_is_a_parse_error() {
        let result = serde_json::from_str::<Request>(r#"{"id":1,"action":"mystery"}"#);
        assert!(result.is_err());
    }
}
