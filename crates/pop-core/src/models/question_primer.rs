//! Open questions to prime before deep-work sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub site: String,
    pub asked_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionPrimer {
    pub questions: Vec<Question>,
    pub deep_work_sites: Vec<String>,
    pub enabled: bool,
}

impl Default for QuestionPrimer {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            deep_work_sites: [
                "github.com",
                "docs.google.com",
                "notion.so",
                "figma.com",
                "gitlab.com",
                "stackoverflow.com",
            ]
            .map(String::from)
            .to_vec(),
            enabled: true,
        }
    }
}

impl Document for QuestionPrimer {
    const KEY: &'static str = keys::QUESTION_PRIMER;
}

impl QuestionPrimer {
    pub fn add_question(&mut self, question: String, site: String, now: DateTime<Utc>) -> Question {
        let entry = Question {
            id: new_id(),
            question,
            site,
            asked_at: now,
            answered_at: None,
            resolved: false,
        };
        self.questions.insert(0, entry.clone());
        entry
    }

    /// Toggle resolution; resolving stamps `answered_at`, reopening clears it.
    pub fn resolve_question(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        match self.questions.iter_mut().find(|q| q.id == id) {
            Some(question) => {
                question.resolved = !question.resolved;
                question.answered_at = question.resolved.then_some(now);
                true
            }
            None => false,
        }
    }

    pub fn delete_question(&mut self, id: &str) {
        self.questions.retain(|q| q.id != id);
    }
}
