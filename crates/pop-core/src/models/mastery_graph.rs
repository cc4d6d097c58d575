//! One tracked metric, one value per day, and a streak counter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

/// Entries kept, newest first.
const MAX_ENTRIES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    pub unit: String,
}

impl Default for Metric {
    fn default() -> Self {
        Self { name: "Progress Points".into(), unit: "points".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryEntry {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasteryGraph {
    pub metric: Metric,
    pub entries: Vec<MasteryEntry>,
    pub streak: u32,
}

impl Document for MasteryGraph {
    const KEY: &'static str = keys::MASTERY_GRAPH;
}

impl MasteryGraph {
    /// Record today's value (overwriting an earlier log for the same day)
    /// and update the streak: beating yesterday extends it, anything else
    /// resets to 1 or 0 depending on whether today's value beats zero.
    pub fn log_value(&mut self, value: f64, today: NaiveDate) {
        let yesterday = today.pred_opt();
        let yesterday_value = yesterday.and_then(|date| {
            self.entries
                .iter()
                .find(|e| e.date == date)
                .map(|e| e.value)
        });

        match self.entries.iter_mut().find(|e| e.date == today) {
            Some(entry) => entry.value = value,
            None => self.entries.insert(0, MasteryEntry { date: today, value }),
        }

        self.streak = match yesterday_value {
            Some(prev) if value > prev => self.streak + 1,
            Some(_) => 0,
            None => {
                if value > 0.0 {
                    1
                } else {
                    0
                }
            }
        };

        self.entries.truncate(MAX_ENTRIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn beating_yesterday_extends_the_streak() {
        let mut doc = MasteryGraph::default();
        doc.log_value(10.0, day(1));
        assert_eq!(doc.streak, 1);
        doc.log_value(12.0, day(2));
        assert_eq!(doc.streak, 2);
        doc.log_value(11.0, day(3));
        assert_eq!(doc.streak, 0);
    }

    #[test]
    fn same_day_relog_overwrites() {
        let mut doc = MasteryGraph::default();
        doc.log_value(10.0, day(1));
        doc.log_value(15.0, day(1));
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].value, 15.0);
    }
}
