//! Purposes and the tasks gated behind them. A task's `purpose_id` is an
//! informal reference; a dangling id simply renders as "no purpose".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purpose {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatedTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub purpose_id: Option<String>,
    #[serde(default)]
    pub autonomy: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurposeGatekeeper {
    pub purposes: Vec<Purpose>,
    pub tasks: Vec<GatedTask>,
}

impl Document for PurposeGatekeeper {
    const KEY: &'static str = keys::PURPOSE_GATEKEEPER;
}

impl PurposeGatekeeper {
    pub fn add_purpose(&mut self, name: String, color: String, description: String) -> Purpose {
        let purpose = Purpose { id: new_id(), name, color, description };
        self.purposes.push(purpose.clone());
        purpose
    }

    pub fn add_task(
        &mut self,
        text: String,
        purpose_id: Option<String>,
        autonomy: String,
        now: DateTime<Utc>,
    ) -> GatedTask {
        let task = GatedTask {
            id: new_id(),
            text,
            purpose_id,
            autonomy,
            created_at: now,
            completed: false,
        };
        self.tasks.insert(0, task.clone());
        task
    }

    pub fn purpose_name(&self, task: &GatedTask) -> Option<&str> {
        let id = task.purpose_id.as_deref()?;
        self.purposes
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_purpose_reference_is_tolerated() {
        let mut doc = PurposeGatekeeper::default();
        let task = doc.add_task(
            "write report".into(),
            Some("gone".into()),
            "full".into(),
            Utc::now(),
        );
        assert_eq!(doc.purpose_name(&task), None);
    }
}
