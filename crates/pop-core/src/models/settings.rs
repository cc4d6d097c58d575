//! Global settings document: per-feature enabled flags plus the shared
//! schedule configuration.

use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UtilityConfig {
    pub enabled: bool,
    pub hotkey: String,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self { enabled: true, hotkey: String::new() }
    }
}

fn on(hotkey: &str) -> UtilityConfig {
    UtilityConfig { enabled: true, hotkey: hotkey.to_string() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Utilities {
    pub cognitive_offload: UtilityConfig,
    pub cash_flow: UtilityConfig,
    pub net_worth: UtilityConfig,
    pub stock_watchlist: UtilityConfig,
    pub purpose_gatekeeper: UtilityConfig,
    pub daily_negotiator: UtilityConfig,
    pub question_primer: UtilityConfig,
    pub flow_thermometer: UtilityConfig,
    pub truth_logger: UtilityConfig,
    pub tab_snoozer: UtilityConfig,
    pub mastery_graph: UtilityConfig,
    pub digital_cleaner: UtilityConfig,
    pub weekly_review: UtilityConfig,
    pub life_calculator: UtilityConfig,
}

impl Default for Utilities {
    fn default() -> Self {
        Self {
            cognitive_offload: on("Alt+C"),
            cash_flow: on("Alt+M"),
            net_worth: on("Alt+N"),
            stock_watchlist: on("Alt+S"),
            purpose_gatekeeper: on("Alt+G"),
            daily_negotiator: on("Alt+D"),
            question_primer: on("Alt+Q"),
            flow_thermometer: on("Alt+F"),
            truth_logger: on("Alt+T"),
            tab_snoozer: on("Alt+B"),
            mastery_graph: on("Alt+Y"),
            digital_cleaner: on("Alt+K"),
            weekly_review: on("Alt+W"),
            life_calculator: on("Alt+L"),
        }
    }
}

/// Day-of-week (0 = Sunday) plus wall-clock hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleTime {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Default for ScheduleTime {
    fn default() -> Self {
        // Friday 4 PM
        Self { day: 5, hour: 16, minute: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub utilities: Utilities,
    pub weekly_review_time: ScheduleTime,
    pub weekly_review_dismissible: bool,
    pub flow_check_interval: u32,
    pub flow_check_pauseable: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utilities: Utilities::default(),
            weekly_review_time: ScheduleTime::default(),
            weekly_review_dismissible: true,
            flow_check_interval: 30,
            flow_check_pauseable: true,
        }
    }
}

impl Document for Settings {
    const KEY: &'static str = keys::SETTINGS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_merge_with_defaults() {
        let stored = serde_json::json!({
            "utilities": {
                "flowThermometer": { "enabled": false }
            }
        });
        let settings: Settings = serde_json::from_value(stored).unwrap();
        assert!(!settings.utilities.flow_thermometer.enabled);
        // Untouched utilities keep their default enabled flag and hotkey.
        assert!(settings.utilities.tab_snoozer.enabled);
        assert_eq!(settings.utilities.tab_snoozer.hotkey, "Alt+B");
        assert_eq!(settings.weekly_review_time.day, 5);
    }
}
