//! Quick-capture thought inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtKind {
    Actionable,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ThoughtKind,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CognitiveOffload {
    pub thoughts: Vec<Thought>,
}

impl Document for CognitiveOffload {
    const KEY: &'static str = keys::COGNITIVE_OFFLOAD;
}

impl CognitiveOffload {
    /// Prepend a new thought (newest first) and return a copy of it.
    pub fn add_thought(&mut self, text: String, kind: ThoughtKind, now: DateTime<Utc>) -> Thought {
        let thought = Thought {
            id: new_id(),
            text,
            kind,
            created_at: now,
            completed: false,
        };
        self.thoughts.insert(0, thought.clone());
        thought
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.thoughts.iter_mut().find(|t| t.id == id) {
            Some(thought) => {
                thought.completed = !thought.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.thoughts.len();
        self.thoughts.retain(|t| t.id != id);
        self.thoughts.len() != before
    }

    pub fn clear_completed(&mut self) {
        self.thoughts.retain(|t| !t.completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn add_thought_prepends() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut doc = CognitiveOffload::default();
        doc.add_thought("first".into(), ThoughtKind::Actionable, now);
        let second = doc.add_thought("second".into(), ThoughtKind::Reference, now);

        assert_eq!(doc.thoughts.len(), 2);
        assert_eq!(doc.thoughts[0].id, second.id);
        assert!(!second.id.is_empty());
        assert!(!doc.thoughts[0].completed);
    }

    #[test]
    fn clear_completed_keeps_open_thoughts() {
        let now = Utc::now();
        let mut doc = CognitiveOffload::default();
        let kept = doc.add_thought("keep".into(), ThoughtKind::Actionable, now);
        let done = doc.add_thought("done".into(), ThoughtKind::Actionable, now);
        doc.toggle(&done.id);
        doc.clear_completed();

        assert_eq!(doc.thoughts.len(), 1);
        assert_eq!(doc.thoughts[0].id, kept.id);
    }
}
