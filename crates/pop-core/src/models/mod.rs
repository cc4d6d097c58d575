//! Feature documents.
//!
//! One serde struct per persisted JSON document, each with the hard-coded
//! default shape readers fall back to when the key is absent. Container-level
//! `#[serde(default)]` makes partially-written documents merge with their
//! defaults field by field.

pub mod cash_flow;
pub mod cognitive_offload;
pub mod daily_negotiator;
pub mod digital_cleaner;
pub mod flow_thermometer;
pub mod life_calculator;
pub mod mastery_graph;
pub mod net_worth;
pub mod purpose_gatekeeper;
pub mod question_primer;
pub mod settings;
pub mod stock_watchlist;
pub mod tab_snoozer;
pub mod truth_logger;
pub mod weekly_review;

pub use cash_flow::{CashFlow, Transaction, TransactionKind};
pub use cognitive_offload::{CognitiveOffload, Thought, ThoughtKind};
pub use daily_negotiator::{DailyNegotiator, DailyPlan, PlanTask};
pub use digital_cleaner::{ArchivedBookmark, DigitalCleaner};
pub use flow_thermometer::{FlowReading, FlowState, FlowThermometer};
pub use life_calculator::LifeCalculator;
pub use mastery_graph::{MasteryEntry, MasteryGraph};
pub use net_worth::{NetWorth, NetWorthEntry};
pub use purpose_gatekeeper::{GatedTask, Purpose, PurposeGatekeeper};
pub use question_primer::{Question, QuestionPrimer};
pub use settings::{ScheduleTime, Settings, UtilityConfig};
pub use stock_watchlist::{Stock, StockWatchlist, Watchlist};
pub use tab_snoozer::{SnoozedTab, TabSnoozer};
pub use truth_logger::{SiteCategory, TimeLogEntry, TruthLogger};
pub use weekly_review::{Review, ReviewSchedule, WeeklyReview};

use crate::constants::keys;
use crate::store::{save, KvStore, StoreError};

/// Generate a unique record id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Write the default shape for every feature document that is not present
/// yet and stamp the first-run marker. Returns whether this was a first run.
pub fn seed_defaults(store: &dyn KvStore) -> Result<bool, StoreError> {
    if store.get(keys::FIRST_RUN)?.is_some() {
        return Ok(false);
    }

    save(store, &Settings::default())?;
    save(store, &CognitiveOffload::default())?;
    save(store, &CashFlow::default())?;
    save(store, &NetWorth::default())?;
    save(store, &StockWatchlist::default())?;
    save(store, &PurposeGatekeeper::default())?;
    save(store, &DailyNegotiator::default())?;
    save(store, &QuestionPrimer::default())?;
    save(store, &FlowThermometer::default())?;
    save(store, &TruthLogger::default())?;
    save(store, &TabSnoozer::default())?;
    save(store, &MasteryGraph::default())?;
    save(store, &DigitalCleaner::default())?;
    save(store, &WeeklyReview::default())?;
    save(store, &LifeCalculator::default())?;

    store.set(keys::FIRST_RUN, serde_json::Value::Bool(true))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn seed_runs_once() {
        let store = MemoryStore::new();
        assert!(seed_defaults(&store).unwrap());
        assert!(!seed_defaults(&store).unwrap());
        for key in keys::ALL {
            assert!(store.get(key).unwrap().is_some(), "{key} not seeded");
        }
    }
}
