//! Snoozed tabs waiting for their wake time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozedTab {
    pub id: String,
    pub url: String,
    pub title: String,
    pub snoozed_at: DateTime<Utc>,
    pub wake_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabSnoozer {
    pub snoozed_tabs: Vec<SnoozedTab>,
    pub idle_threshold_minutes: u64,
    pub default_snooze_hours: i64,
}

impl Default for TabSnoozer {
    fn default() -> Self {
        Self {
            snoozed_tabs: Vec::new(),
            idle_threshold_minutes: 5,
            default_snooze_hours: 24,
        }
    }
}

impl Document for TabSnoozer {
    const KEY: &'static str = keys::TAB_SNOOZER;
}

impl TabSnoozer {
    pub fn snooze(
        &mut self,
        url: String,
        title: String,
        wake_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SnoozedTab {
        let tab = SnoozedTab {
            id: new_id(),
            url,
            title,
            snoozed_at: now,
            wake_at,
        };
        self.snoozed_tabs.push(tab.clone());
        tab
    }

    /// Remove and return every tab whose wake time has passed; tabs with a
    /// future `wake_at` stay untouched.
    pub fn wake_due(&mut self, now: DateTime<Utc>) -> Vec<SnoozedTab> {
        let (due, remaining): (Vec<_>, Vec<_>) = self
            .snoozed_tabs
            .drain(..)
            .partition(|tab| tab.wake_at <= now);
        self.snoozed_tabs = remaining;
        due
    }

    pub fn wake_one(&mut self, id: &str) -> Option<SnoozedTab> {
        let idx = self.snoozed_tabs.iter().position(|t| t.id == id)?;
        Some(self.snoozed_tabs.remove(idx))
    }
}
