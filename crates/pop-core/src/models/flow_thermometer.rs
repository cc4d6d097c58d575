//! Flow-state check-ins: difficulty vs. skill readings plus the pause
//! window the periodic flow check honors.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

/// Readings kept, newest first.
const MAX_READINGS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowState {
    Anxiety,
    Boredom,
    Flow,
}

/// Anxiety when the task outruns the skill by more than 2, boredom when the
/// skill outruns the task by more than 2, flow otherwise.
pub fn flow_state(difficulty: i32, skill: i32) -> FlowState {
    let delta = difficulty - skill;
    if delta > 2 {
        FlowState::Anxiety
    } else if delta < -2 {
        FlowState::Boredom
    } else {
        FlowState::Flow
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReading {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub difficulty: i32,
    pub skill: i32,
    pub state: FlowState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowSuggestions {
    pub anxiety: String,
    pub boredom: String,
    pub flow: String,
}

impl Default for FlowSuggestions {
    fn default() -> Self {
        Self {
            anxiety: "Try breaking this task into smaller, manageable pieces.".into(),
            boredom: "Add a constraint or challenge to make it more interesting.".into(),
            flow: "Great! You are in the zone. Keep going!".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowThermometer {
    pub readings: Vec<FlowReading>,
    pub interval_minutes: u32,
    pub paused: bool,
    pub paused_until: Option<DateTime<Utc>>,
    pub suggestions: FlowSuggestions,
}

impl Default for FlowThermometer {
    fn default() -> Self {
        Self {
            readings: Vec::new(),
            interval_minutes: 30,
            paused: false,
            paused_until: None,
            suggestions: FlowSuggestions::default(),
        }
    }
}

impl Document for FlowThermometer {
    const KEY: &'static str = keys::FLOW_THERMOMETER;
}

impl FlowThermometer {
    /// A pause with an elapsed `paused_until` counts as active; there is no
    /// explicit unpause event.
    pub fn is_paused(&self, now: DateTime<Utc>) -> bool {
        self.paused && self.paused_until.map_or(true, |until| until > now)
    }

    pub fn pause_for(&mut self, minutes: i64, now: DateTime<Utc>) {
        self.paused = true;
        self.paused_until = Some(now + Duration::minutes(minutes));
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.paused_until = None;
    }

    pub fn add_reading(&mut self, difficulty: i32, skill: i32, now: DateTime<Utc>) -> FlowReading {
        let reading = FlowReading {
            id: new_id(),
            timestamp: now,
            difficulty,
            skill,
            state: flow_state(difficulty, skill),
        };
        self.readings.insert(0, reading.clone());
        self.readings.truncate(MAX_READINGS);
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn state_boundaries() {
        assert_eq!(flow_state(8, 5), FlowState::Anxiety);
        assert_eq!(flow_state(7, 5), FlowState::Flow);
        assert_eq!(flow_state(5, 7), FlowState::Flow);
        assert_eq!(flow_state(5, 8), FlowState::Boredom);
    }

    #[test]
    fn pause_expires_lazily() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut doc = FlowThermometer::default();
        assert!(!doc.is_paused(now));

        doc.pause_for(30, now);
        assert!(doc.is_paused(now));
        assert!(doc.is_paused(now + Duration::minutes(29)));
        assert!(!doc.is_paused(now + Duration::minutes(30)));
    }

    #[test]
    fn readings_cap_at_one_hundred() {
        let now = Utc::now();
        let mut doc = FlowThermometer::default();
        for i in 0..110 {
            doc.add_reading(i % 10, 5, now);
        }
        assert_eq!(doc.readings.len(), 100);
    }
}
