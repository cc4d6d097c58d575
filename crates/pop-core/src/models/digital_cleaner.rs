//! Old-bookmark triage state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedBookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DigitalCleaner {
    pub processed_bookmarks: Vec<String>,
    pub archived_bookmarks: Vec<ArchivedBookmark>,
    pub last_clean_date: Option<NaiveDate>,
    pub clean_on_startup: bool,
}

impl Default for DigitalCleaner {
    fn default() -> Self {
        Self {
            processed_bookmarks: Vec::new(),
            archived_bookmarks: Vec::new(),
            last_clean_date: None,
            clean_on_startup: true,
        }
    }
}

impl Document for DigitalCleaner {
    const KEY: &'static str = keys::DIGITAL_CLEANER;
}

impl DigitalCleaner {
    pub fn is_processed(&self, id: &str) -> bool {
        self.processed_bookmarks.iter().any(|p| p == id)
    }

    /// Archive a bookmark and mark it processed so later sweeps skip it.
    pub fn archive(&mut self, id: String, title: String, url: String, now: DateTime<Utc>) {
        self.archived_bookmarks.push(ArchivedBookmark {
            id: id.clone(),
            title,
            url,
            archived_at: now,
        });
        self.processed_bookmarks.push(id);
    }

    /// Mark a bookmark processed without archiving (the "keep" choice).
    pub fn keep(&mut self, id: String) {
        if !self.is_processed(&id) {
            self.processed_bookmarks.push(id);
        }
    }
}
