//! Named recurring alarms.
//!
//! Three fixed periodic timers, registered once at daemon startup and owned
//! by the runtime for the life of the process. A missed or delayed tick is
//! simply absent until the next period; the checks re-evaluate a condition
//! each firing, so nothing is retried.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::Coordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alarm {
    FlowCheck,
    TabSnoozeCheck,
    WeeklyReviewCheck,
}

impl Alarm {
    pub const ALL: [Alarm; 3] = [Alarm::FlowCheck, Alarm::TabSnoozeCheck, Alarm::WeeklyReviewCheck];

    pub fn name(self) -> &'static str {
        match self {
            Alarm::FlowCheck => "flowCheck",
            Alarm::TabSnoozeCheck => "tabSnoozeCheck",
            Alarm::WeeklyReviewCheck => "weeklyReviewCheck",
        }
    }

    pub fn period(self) -> Duration {
        match self {
            Alarm::FlowCheck => Duration::from_secs(30 * 60),
            Alarm::TabSnoozeCheck => Duration::from_secs(5 * 60),
            Alarm::WeeklyReviewCheck => Duration::from_secs(60 * 60),
        }
    }
}

/// Spawn one interval task per alarm, each dispatching back into the
/// coordinator. Idempotent: a second call registers nothing.
pub fn register_alarms(coordinator: &Arc<Coordinator>) -> Vec<JoinHandle<()>> {
    if coordinator
        .alarms_registered
        .swap(true, Ordering::SeqCst)
    {
        return Vec::new();
    }

    Alarm::ALL
        .iter()
        .map(|&alarm| {
            let coordinator = Arc::clone(coordinator);
            tokio::spawn(async move {
                // First tick after one full period, like a fresh platform
                // alarm; late ticks are delayed, not replayed.
                let start = time::Instant::now() + alarm.period();
                let mut interval = time::interval_at(start, alarm.period());
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    coordinator.handle_alarm(alarm);
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_match_the_schedule() {
        assert_eq!(Alarm::FlowCheck.period(), Duration::from_secs(1800));
        assert_eq!(Alarm::TabSnoozeCheck.period(), Duration::from_secs(300));
        assert_eq!(Alarm::WeeklyReviewCheck.period(), Duration::from_secs(3600));
    }

    #[test]
    fn alarm_names_round_trip_through_serde() {
        for alarm in Alarm::ALL {
            let encoded = serde_json::to_value(alarm).unwrap();
            assert_eq!(encoded, serde_json::json!(alarm.name()));
            let decoded: Alarm = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, alarm);
        }
    }
}
