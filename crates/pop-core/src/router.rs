//! Message router: one exhaustive match over the action enum.
//!
//! Every handler resolves with a structured result. Validation failures
//! come back as `{success: false, ...}` payloads, never as transport errors
//! and never as panics; transport errors are reserved for requests the
//! router cannot interpret at all.

use serde_json::json;
use tracing::warn;

use crate::constants::keys;
use crate::coordinator::{Coordinator, NotificationRequest};
use crate::models::{CognitiveOffload, Settings, TabSnoozer, TruthLogger};
use crate::protocol::{MessageAction, Request, Response};
use crate::store::{self, csv, StoreError};

/// A routed request: the response plus whether the daemon should exit.
pub struct Routed {
    pub response: Response,
    pub shutdown: bool,
}

impl Routed {
    fn reply(response: Response) -> Self {
        Self { response, shutdown: false }
    }
}

pub fn handle_request(
    coordinator: &Coordinator,
    request: Request,
    started_at: std::time::Instant,
) -> Routed {
    let id = request.id;

    match request.action {
        MessageAction::SaveThought { text, kind } => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Routed::reply(Response::success(
                    id,
                    json!({ "success": false, "message": "Nothing to capture" }),
                ));
            }
            let now = coordinator.clock().now();
            let result = store::update::<CognitiveOffload, _>(coordinator.store(), |doc| {
                doc.add_thought(text, kind, now)
            });
            Routed::reply(match result {
                Ok(thought) => {
                    Response::success(id, json!({ "success": true, "thought": thought }))
                }
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::GetSettings => {
            let settings: Settings = store::load(coordinator.store());
            Routed::reply(match serde_json::to_value(&settings) {
                Ok(value) => Response::success(id, value),
                Err(err) => store_failure(id, err.into()),
            })
        }

        MessageAction::CategorizeSite { domain, category } => {
            let result = store::update::<TruthLogger, _>(coordinator.store(), |doc| {
                doc.categorize(domain, category);
            });
            Routed::reply(match result {
                Ok(()) => Response::success(id, json!({ "success": true })),
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::LogTime { category, minutes } => {
            let today = coordinator.clock().today();
            let result = store::update::<TruthLogger, _>(coordinator.store(), |doc| {
                doc.log_time(category, minutes, today);
            });
            Routed::reply(match result {
                Ok(()) => Response::success(id, json!({ "success": true })),
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::OpenDashboard { hash } => {
            coordinator.tabs().open_dashboard(hash.as_deref());
            Routed::reply(Response::success(id, json!({ "success": true })))
        }

        MessageAction::SnoozeTab { url, title, wake_at } => {
            let now = coordinator.clock().now();
            let result = store::update::<TabSnoozer, _>(coordinator.store(), |doc| {
                doc.snooze(url, title, wake_at, now)
            });
            Routed::reply(match result {
                Ok(tab) => Response::success(id, json!({ "success": true, "tab": tab })),
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::SaveLink { url, title } => {
            // A save, not a snooze: the tab wakes on the next check.
            let now = coordinator.clock().now();
            let title = title.unwrap_or_else(|| url.clone());
            let result = store::update::<TabSnoozer, _>(coordinator.store(), |doc| {
                doc.snooze(url, title, now, now)
            });
            Routed::reply(match result {
                Ok(tab) => {
                    // Ad hoc notification id; link saves have no fixed slot.
                    coordinator.notifier().notify(NotificationRequest::basic(
                        &uuid::Uuid::new_v4().to_string(),
                        "Link Saved",
                        "Link saved to POP Tab Snoozer.",
                        1,
                    ));
                    Response::success(id, json!({ "success": true, "tab": tab }))
                }
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::CaptureSelection { text } => {
            if text.trim().is_empty() {
                return Routed::reply(Response::success(
                    id,
                    json!({ "success": false, "message": "Nothing selected" }),
                ));
            }
            coordinator.push(crate::protocol::ContentPush::CaptureSelection { text });
            Routed::reply(Response::success(id, json!({ "success": true })))
        }

        MessageAction::NotifyAction { id: notification_id, button_index } => {
            coordinator.handle_notification_action(&notification_id, button_index);
            Routed::reply(Response::success(id, json!({ "success": true })))
        }

        MessageAction::CheckNow { alarm } => {
            coordinator.handle_alarm(alarm);
            Routed::reply(Response::success(id, json!({ "success": true })))
        }

        MessageAction::Command { command, domain } => {
            coordinator.handle_command(command, domain.as_deref());
            Routed::reply(Response::success(id, json!({ "success": true })))
        }

        MessageAction::ExportCsv { key } => {
            if !keys::ALL.contains(&key.as_str()) {
                return Routed::reply(Response::error(
                    id,
                    "UNKNOWN_KEY",
                    &format!("Unknown storage key: {key}"),
                ));
            }
            Routed::reply(match csv::export_csv(coordinator.store(), &key) {
                Ok(csv) => Response::success(id, json!({ "success": true, "csv": csv })),
                Err(err) => store_failure(id, err),
            })
        }

        MessageAction::ImportCsv { key, csv: content, merge } => {
            if !keys::ALL.contains(&key.as_str()) {
                return Routed::reply(Response::error(
                    id,
                    "UNKNOWN_KEY",
                    &format!("Unknown storage key: {key}"),
                ));
            }
            let outcome = csv::import_csv(coordinator.store(), &key, &content, merge);
            Routed::reply(Response::success(
                id,
                json!({
                    "success": outcome.success,
                    "message": outcome.message,
                    "count": outcome.count,
                }),
            ))
        }

        // The daemon intercepts the subscription before routing; reaching
        // this arm just acknowledges it.
        MessageAction::SubscribeOverlays => {
            Routed::reply(Response::success(id, json!({ "subscribed": true })))
        }

        MessageAction::Status => Routed::reply(Response::success(
            id,
            json!({
                "status": "running",
                "uptimeSeconds": started_at.elapsed().as_secs(),
            }),
        )),

        MessageAction::Shutdown => Routed {
            response: Response::success(id, json!({ "status": "shutting_down" })),
            shutdown: true,
        },
    }
}

/// Recoverable storage failures resolve, they do not reject.
fn store_failure(id: u64, err: StoreError) -> Response {
    warn!(%err, "message handler hit a storage error");
    Response::success(id, json!({ "success": false, "message": err.to_string() }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use chrono::{Duration, TimeZone, Utc};

    use crate::clock::{Clock, ManualClock};
    use crate::coordinator::{RecordingNotifier, RecordingOpener};
    use crate::models::{SiteCategory, ThoughtKind};
    use crate::store::KvStore;

    use super::*;

    struct Harness {
        coordinator: Coordinator,
        clock: Arc<ManualClock>,
        notifier: Arc<RecordingNotifier>,
        opener: Arc<RecordingOpener>,
        started_at: Instant,
    }

    impl Harness {
        fn route(&self, id: u64, action: MessageAction) -> Routed {
            handle_request(&self.coordinator, Request { id, action }, self.started_at)
        }

        fn result(&self, action: MessageAction) -> serde_json::Value {
            self.route(1, action)
                .response
                .result
                .expect("handler resolves with a result")
        }
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let opener = Arc::new(RecordingOpener::new());
        let coordinator = Coordinator::new(
            Arc::new(crate::store::MemoryStore::new()),
            clock.clone(),
            notifier.clone(),
            opener.clone(),
        );
        Harness { coordinator, clock, notifier, opener, started_at: Instant::now() }
    }

    #[test]
    fn save_thought_rejects_blank_text() {
        let h = harness();
        let result = h.result(MessageAction::SaveThought {
            text: "   ".into(),
            kind: ThoughtKind::Actionable,
        });
        assert_eq!(result["success"], false);

        let doc: CognitiveOffload = store::load(h.coordinator.store());
        assert!(doc.thoughts.is_empty());
    }

    #[test]
    fn save_thought_prepends_a_record() {
        let h = harness();
        let result = h.result(MessageAction::SaveThought {
            text: "buy milk".into(),
            kind: ThoughtKind::Actionable,
        });
        assert_eq!(result["success"], true);
        assert_eq!(result["thought"]["completed"], false);
        assert!(!result["thought"]["id"].as_str().unwrap_or_default().is_empty());
        assert_eq!(result["thought"]["createdAt"], "2024-05-01T12:00:00Z");

        let doc: CognitiveOffload = store::load(h.coordinator.store());
        assert_eq!(doc.thoughts.len(), 1);
        assert_eq!(doc.thoughts[0].text, "buy milk");
    }

    #[test]
    fn log_time_buckets_by_calendar_day() {
        let h = harness();
        let log = |minutes: f64| MessageAction::LogTime { category: SiteCategory::Deep, minutes };
        h.result(log(30.0));
        h.result(log(30.0));

        let doc: TruthLogger = store::load(h.coordinator.store());
        assert_eq!(doc.time_log.len(), 1);
        assert_eq!(doc.time_log[0].deep, 60.0);

        h.clock.advance(Duration::days(1));
        h.result(log(10.0));
        let doc: TruthLogger = store::load(h.coordinator.store());
        assert_eq!(doc.time_log.len(), 2);
        assert_eq!(doc.time_log[0].deep, 10.0);
    }

    #[test]
    fn categorize_site_upserts() {
        let h = harness();
        let categorize = |category| MessageAction::CategorizeSite {
            domain: "mail.example".into(),
            category,
        };
        assert_eq!(h.result(categorize(SiteCategory::Deep))["success"], true);
        assert_eq!(h.result(categorize(SiteCategory::Shallow))["success"], true);

        let doc: TruthLogger = store::load(h.coordinator.store());
        assert_eq!(doc.category_for("mail.example"), Some(SiteCategory::Shallow));
        assert_eq!(doc.site_categories.len(), 1);
    }

    #[test]
    fn save_link_wakes_immediately_and_notifies() {
        let h = harness();
        let result = h.result(MessageAction::SaveLink {
            url: "https://saved.example".into(),
            title: None,
        });
        assert_eq!(result["success"], true);

        let doc: TabSnoozer = store::load(h.coordinator.store());
        assert_eq!(doc.snoozed_tabs.len(), 1);
        assert_eq!(doc.snoozed_tabs[0].title, "https://saved.example");
        assert!(doc.snoozed_tabs[0].wake_at <= h.clock.now());

        assert_eq!(h.notifier.delivered.lock().len(), 1);
    }

    #[test]
    fn open_dashboard_passes_the_anchor_through() {
        let h = harness();
        h.result(MessageAction::OpenDashboard { hash: Some("cash-flow".into()) });
        assert_eq!(*h.opener.dashboards.lock(), vec![Some("cash-flow".to_string())]);
    }

    #[test]
    fn csv_round_trips_through_the_router() {
        let h = harness();
        h.result(MessageAction::SaveThought {
            text: "first".into(),
            kind: ThoughtKind::Reference,
        });

        let exported = h.result(MessageAction::ExportCsv {
            key: keys::COGNITIVE_OFFLOAD.into(),
        });
        let csv = exported["csv"].as_str().expect("csv payload").to_string();

        h.coordinator.store().remove(keys::COGNITIVE_OFFLOAD).unwrap();
        let imported = h.result(MessageAction::ImportCsv {
            key: keys::COGNITIVE_OFFLOAD.into(),
            csv,
            merge: false,
        });
        assert_eq!(imported["success"], true);

        let doc: CognitiveOffload = store::load(h.coordinator.store());
        assert_eq!(doc.thoughts.len(), 1);
        assert_eq!(doc.thoughts[0].text, "first");
        assert_eq!(doc.thoughts[0].kind, ThoughtKind::Reference);
    }

    #[test]
    fn export_rejects_unknown_keys() {
        let h = harness();
        let routed = h.route(9, MessageAction::ExportCsv { key: "pop_mystery".into() });
        let error = routed.response.error.expect("transport error");
        assert_eq!(error.code, "UNKNOWN_KEY");
    }

    #[test]
    fn shutdown_flags_the_daemon() {
        let h = harness();
        assert!(!h.route(1, MessageAction::Status).shutdown);
        assert!(h.route(2, MessageAction::Shutdown).shutdown);
    }
}
