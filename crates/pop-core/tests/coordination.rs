//! End-to-end behavior of the coordinator and router against an in-memory
//! store and a manual clock.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, TimeZone, Utc};

use pop_core::clock::{Clock, ManualClock};
use pop_core::constants::{keys, notifications};
use pop_core::coordinator::{Alarm, Coordinator, RecordingNotifier, RecordingOpener};
use pop_core::models::{
    self, CognitiveOffload, FlowThermometer, Settings, SiteCategory, TabSnoozer, ThoughtKind,
    TruthLogger, WeeklyReview,
};
use pop_core::protocol::{MessageAction, Request, Response};
use pop_core::router;
use pop_core::store::{self, csv, KvStore, MemoryStore};

struct Harness {
    coordinator: Coordinator,
    clock: Arc<ManualClock>,
    notifier: Arc<RecordingNotifier>,
    opener: Arc<RecordingOpener>,
}

impl Harness {
    fn new(now: DateTime<Utc>) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let notifier = Arc::new(RecordingNotifier::new());
        let opener = Arc::new(RecordingOpener::new());
        let coordinator = Coordinator::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            notifier.clone(),
            opener.clone(),
        );
        Self { coordinator, clock, notifier, opener }
    }

    fn send(&self, action: MessageAction) -> Response {
        router::handle_request(&self.coordinator, Request { id: 1, action }, Instant::now())
            .response
    }
}

fn wednesday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn every_document_synthesizes_its_default_shape_on_an_empty_store() {
    let store = MemoryStore::new();

    let settings: Settings = store::load(&store);
    assert!(settings.utilities.flow_thermometer.enabled);
    assert_eq!(settings.flow_check_interval, 30);
    assert_eq!(settings.weekly_review_time.day, 5);

    let flow: FlowThermometer = store::load(&store);
    assert!(!flow.paused);
    assert_eq!(flow.interval_minutes, 30);

    let snoozer: TabSnoozer = store::load(&store);
    assert!(snoozer.snoozed_tabs.is_empty());
    assert_eq!(snoozer.idle_threshold_minutes, 5);
    assert_eq!(snoozer.default_snooze_hours, 24);

    let review: WeeklyReview = store::load(&store);
    assert_eq!(review.questions.len(), 5);
    assert_eq!(review.last_prompt_date, None);

    let truth: TruthLogger = store::load(&store);
    assert!(truth.site_categories.is_empty());
    assert!(truth.current_session.start_time.is_none());

    let offload: CognitiveOffload = store::load(&store);
    assert!(offload.thoughts.is_empty());

    // Seeding writes every key, so later readers see concrete documents.
    assert!(models::seed_defaults(&store).unwrap());
    for key in keys::ALL {
        assert!(store.get(key).unwrap().is_some(), "{key} missing after seed");
    }
}

#[test]
fn flow_check_guards_suppress_every_notification() {
    // Disabled feature.
    let h = Harness::new(wednesday_noon());
    let mut settings = Settings::default();
    settings.utilities.flow_thermometer.enabled = false;
    store::save(h.coordinator.store(), &settings).unwrap();
    h.coordinator.handle_alarm(Alarm::FlowCheck);
    assert!(h.notifier.delivered.lock().is_empty());

    // Enabled but paused with a future deadline.
    let h = Harness::new(wednesday_noon());
    store::update::<FlowThermometer, _>(h.coordinator.store(), |doc| {
        doc.pause_for(45, wednesday_noon());
    })
    .unwrap();
    h.coordinator.handle_alarm(Alarm::FlowCheck);
    assert!(h.notifier.delivered.lock().is_empty());
}

#[test]
fn flow_pause_round_trip_through_the_notification_button() {
    let h = Harness::new(wednesday_noon());

    // The delivered notification's second button means "pause 30 minutes".
    h.coordinator.handle_alarm(Alarm::FlowCheck);
    assert_eq!(h.notifier.delivered_ids(), vec![notifications::FLOW_CHECK]);
    h.send(MessageAction::NotifyAction {
        id: notifications::FLOW_CHECK.into(),
        button_index: 1,
    });

    let doc: FlowThermometer = store::load(h.coordinator.store());
    let until = doc.paused_until.expect("pause stamped");
    assert!((until - (wednesday_noon() + Duration::minutes(30))).num_seconds().abs() <= 1);

    // An immediate re-fire stays silent; past the pause it notifies again.
    h.coordinator.handle_alarm(Alarm::FlowCheck);
    assert_eq!(h.notifier.delivered.lock().len(), 1);

    h.clock.advance(Duration::minutes(31));
    h.coordinator.handle_alarm(Alarm::FlowCheck);
    assert_eq!(h.notifier.delivered.lock().len(), 2);
}

#[test]
fn snoozed_tab_wakes_exactly_once_through_the_full_path() {
    let h = Harness::new(wednesday_noon());

    h.send(MessageAction::SnoozeTab {
        url: "https://read-later.example/post".into(),
        title: "Read later".into(),
        wake_at: wednesday_noon() + Duration::hours(2),
    });

    // Too early: nothing happens.
    h.coordinator.handle_alarm(Alarm::TabSnoozeCheck);
    assert!(h.opener.urls.lock().is_empty());

    // Past the wake time: opened once, removed, one summary notification.
    h.clock.advance(Duration::hours(3));
    h.coordinator.handle_alarm(Alarm::TabSnoozeCheck);
    assert_eq!(
        *h.opener.urls.lock(),
        vec!["https://read-later.example/post".to_string()]
    );
    assert_eq!(h.notifier.delivered_ids(), vec![notifications::TAB_AWAKE]);

    let doc: TabSnoozer = store::load(h.coordinator.store());
    assert!(doc.snoozed_tabs.is_empty());

    // A further firing has nothing left to do.
    h.coordinator.handle_alarm(Alarm::TabSnoozeCheck);
    assert_eq!(h.opener.urls.lock().len(), 1);
    assert_eq!(h.notifier.delivered.lock().len(), 1);
}

#[test]
fn weekly_review_prompts_exactly_once_per_scheduled_day() {
    // Friday 2024-05-03, 16:20, inside the default Friday-16:00 window.
    let h = Harness::new(Utc.with_ymd_and_hms(2024, 5, 3, 16, 20, 0).unwrap());

    h.coordinator.handle_alarm(Alarm::WeeklyReviewCheck);
    assert_eq!(h.opener.dashboards.lock().len(), 1);
    assert_eq!(h.notifier.delivered_ids(), vec![notifications::WEEKLY_REVIEW]);

    let doc: WeeklyReview = store::load(h.coordinator.store());
    assert_eq!(doc.last_prompt_date, Some(h.clock.today()));

    // Still inside the window, same day: no second prompt.
    h.clock.advance(Duration::minutes(20));
    h.coordinator.handle_alarm(Alarm::WeeklyReviewCheck);
    assert_eq!(h.opener.dashboards.lock().len(), 1);
    assert_eq!(h.notifier.delivered.lock().len(), 1);

    // A week later the stamp no longer matches and the prompt fires again.
    h.clock.advance(Duration::days(7) - Duration::minutes(20));
    h.coordinator.handle_alarm(Alarm::WeeklyReviewCheck);
    assert_eq!(h.notifier.delivered.lock().len(), 2);
}

#[test]
fn save_thought_contract() {
    let h = Harness::new(wednesday_noon());

    let rejected = h.send(MessageAction::SaveThought {
        text: "  ".into(),
        kind: ThoughtKind::Actionable,
    });
    assert_eq!(rejected.result.unwrap()["success"], false);
    let doc: CognitiveOffload = store::load(h.coordinator.store());
    assert!(doc.thoughts.is_empty());

    let accepted = h.send(MessageAction::SaveThought {
        text: "buy milk".into(),
        kind: ThoughtKind::Actionable,
    });
    let result = accepted.result.unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["thought"]["completed"], false);
    assert_eq!(result["thought"]["createdAt"], "2024-05-01T12:00:00Z");

    let doc: CognitiveOffload = store::load(h.coordinator.store());
    assert_eq!(doc.thoughts.len(), 1);
    assert!(!doc.thoughts[0].id.is_empty());
}

#[test]
fn log_time_accumulates_per_calendar_day() {
    let h = Harness::new(wednesday_noon());
    let log = |minutes: f64| MessageAction::LogTime { category: SiteCategory::Deep, minutes };

    h.send(log(30.0));
    h.send(log(30.0));
    let doc: TruthLogger = store::load(h.coordinator.store());
    assert_eq!(doc.time_log.len(), 1);
    assert_eq!(doc.time_log[0].deep, 60.0);

    h.clock.advance(Duration::days(1));
    h.send(log(5.0));
    let doc: TruthLogger = store::load(h.coordinator.store());
    assert_eq!(doc.time_log.len(), 2);
    assert_eq!(doc.time_log[0].deep, 5.0);
    assert_eq!(doc.time_log[1].deep, 60.0);
}

#[test]
fn csv_export_import_reproduces_the_collection() {
    let h = Harness::new(wednesday_noon());
    h.send(MessageAction::SaveThought { text: "alpha".into(), kind: ThoughtKind::Actionable });
    h.send(MessageAction::SaveThought { text: "beta, with comma".into(), kind: ThoughtKind::Reference });

    let before: CognitiveOffload = store::load(h.coordinator.store());
    let exported = csv::export_csv(h.coordinator.store(), keys::COGNITIVE_OFFLOAD).unwrap();

    h.coordinator.store().remove(keys::COGNITIVE_OFFLOAD).unwrap();
    let outcome = csv::import_csv(h.coordinator.store(), keys::COGNITIVE_OFFLOAD, &exported, false);
    assert!(outcome.success, "{}", outcome.message);

    let after: CognitiveOffload = store::load(h.coordinator.store());
    assert_eq!(after, before);
}
