//! Deep/shallow time tracking: a domain→category map plus day-bucketed
//! minute totals.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteCategory {
    Deep,
    Shallow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeLogEntry {
    pub date: Option<NaiveDate>,
    pub deep: f64,
    pub shallow: f64,
}

impl Default for TimeLogEntry {
    fn default() -> Self {
        Self { date: None, deep: 0.0, shallow: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentSession {
    pub start_time: Option<DateTime<Utc>>,
    pub site: Option<String>,
    pub category: Option<SiteCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TruthLogger {
    pub site_categories: HashMap<String, SiteCategory>,
    pub time_log: Vec<TimeLogEntry>,
    pub current_session: CurrentSession,
}

impl Document for TruthLogger {
    const KEY: &'static str = keys::TRUTH_LOGGER;
}

impl TruthLogger {
    pub fn category_for(&self, domain: &str) -> Option<SiteCategory> {
        self.site_categories.get(domain).copied()
    }

    pub fn categorize(&mut self, domain: String, category: SiteCategory) {
        self.site_categories.insert(domain, category);
    }

    /// Add minutes to today's bucket, creating it (newest first) on the
    /// first log of the day.
    pub fn log_time(&mut self, category: SiteCategory, minutes: f64, today: NaiveDate) {
        let entry = match self
            .time_log
            .iter_mut()
            .find(|entry| entry.date == Some(today))
        {
            Some(entry) => entry,
            None => {
                self.time_log.insert(
                    0,
                    TimeLogEntry { date: Some(today), deep: 0.0, shallow: 0.0 },
                );
                &mut self.time_log[0]
            }
        };
        match category {
            SiteCategory::Deep => entry.deep += minutes,
            SiteCategory::Shallow => entry.shallow += minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_time_accumulates_within_a_day() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut doc = TruthLogger::default();
        doc.log_time(SiteCategory::Deep, 30.0, today);
        doc.log_time(SiteCategory::Deep, 30.0, today);

        assert_eq!(doc.time_log.len(), 1);
        assert_eq!(doc.time_log[0].deep, 60.0);
        assert_eq!(doc.time_log[0].shallow, 0.0);
    }

    #[test]
    fn log_time_opens_a_new_bucket_per_day() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let mut doc = TruthLogger::default();
        doc.log_time(SiteCategory::Deep, 60.0, today);
        doc.log_time(SiteCategory::Shallow, 15.0, tomorrow);

        assert_eq!(doc.time_log.len(), 2);
        // Newest bucket first.
        assert_eq!(doc.time_log[0].date, Some(tomorrow));
        assert_eq!(doc.time_log[0].shallow, 15.0);
        assert_eq!(doc.time_log[1].deep, 60.0);
    }
}
