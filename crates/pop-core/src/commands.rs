//! Global-shortcut commands.
//!
//! Each command maps 1:1 to either "open the dashboard at an anchor" or
//! "push an overlay trigger to the active surface". `flow-check` and
//! `time-log` are manual overrides: they fire immediately, bypassing the
//! enabled/paused guards the periodic checks honor.

use serde::{Deserialize, Serialize};

use crate::constants::anchors;
use crate::coordinator::Coordinator;
use crate::models::TruthLogger;
use crate::protocol::ContentPush;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    CognitiveOffload,
    OpenDashboard,
    QuestionPrimer,
    FlowCheck,
    TimeLog,
    DailyPlan,
    NetWorth,
    CashFlow,
    StockCheck,
    WeeklyReview,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::CognitiveOffload,
        Command::OpenDashboard,
        Command::QuestionPrimer,
        Command::FlowCheck,
        Command::TimeLog,
        Command::DailyPlan,
        Command::NetWorth,
        Command::CashFlow,
        Command::StockCheck,
        Command::WeeklyReview,
    ];

    /// Parse the kebab-case command name.
    pub fn parse(name: &str) -> Option<Command> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }
}

impl Coordinator {
    /// Dispatch a global-shortcut command. `domain` is the invoking
    /// surface's site, consulted only by the time-log command.
    pub fn handle_command(&self, command: Command, domain: Option<&str>) {
        tracing::debug!(?command, "command received");
        match command {
            Command::CognitiveOffload => self.push(ContentPush::ShowQuickCapture),
            Command::OpenDashboard => self.tabs().open_dashboard(None),
            Command::QuestionPrimer => self.tabs().open_dashboard(Some(anchors::QUESTION_PRIMER)),
            Command::FlowCheck => self.push(ContentPush::ShowFlowCheck),
            Command::TimeLog => self.trigger_time_log(domain),
            Command::DailyPlan => self.tabs().open_dashboard(Some(anchors::DAILY_NEGOTIATOR)),
            Command::NetWorth => self.tabs().open_dashboard(Some(anchors::NET_WORTH)),
            Command::CashFlow => self.tabs().open_dashboard(Some(anchors::CASH_FLOW)),
            Command::StockCheck => self.tabs().open_dashboard(Some(anchors::STOCK_WATCHLIST)),
            Command::WeeklyReview => self.tabs().open_dashboard(Some(anchors::WEEKLY_REVIEW)),
        }
    }

    /// A categorized site gets its badge straight away; an unknown one gets
    /// the categorize modal first.
    fn trigger_time_log(&self, domain: Option<&str>) {
        let Some(domain) = domain else {
            return;
        };
        let doc: TruthLogger = store::load(self.store());
        match doc.category_for(domain) {
            Some(category) => self.push(ContentPush::ShowTruthBadge {
                category,
                domain: domain.to_string(),
            }),
            None => self.push(ContentPush::CategorizeSite { domain: domain.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::clock::ManualClock;
    use crate::coordinator::{RecordingNotifier, RecordingOpener};
    use crate::models::SiteCategory;
    use crate::store::MemoryStore;

    use super::*;

    fn coordinator() -> Coordinator {
        Coordinator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )),
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingOpener::new()),
        )
    }

    #[test]
    fn parse_accepts_every_command_name() {
        assert_eq!(Command::parse("cognitive-offload"), Some(Command::CognitiveOffload));
        assert_eq!(Command::parse("time-log"), Some(Command::TimeLog));
        assert_eq!(Command::parse("unknown"), None);
    }

    #[test]
    fn flow_check_command_bypasses_guards() {
        let coordinator = coordinator();
        let mut pushes = coordinator.subscribe_pushes();

        // Pause would suppress the periodic check; the command fires anyway.
        coordinator.pause_flow_checks(30);
        coordinator.handle_command(Command::FlowCheck, None);

        assert_eq!(pushes.try_recv().ok(), Some(ContentPush::ShowFlowCheck));
    }

    #[test]
    fn time_log_routes_by_site_category() {
        let coordinator = coordinator();
        let mut pushes = coordinator.subscribe_pushes();

        coordinator.handle_command(Command::TimeLog, Some("mail.example"));
        assert_eq!(
            pushes.try_recv().ok(),
            Some(ContentPush::CategorizeSite { domain: "mail.example".into() })
        );

        store::update::<TruthLogger, _>(coordinator.store(), |doc| {
            doc.categorize("mail.example".into(), SiteCategory::Shallow);
        })
        .unwrap();

        coordinator.handle_command(Command::TimeLog, Some("mail.example"));
        assert_eq!(
            pushes.try_recv().ok(),
            Some(ContentPush::ShowTruthBadge {
                category: SiteCategory::Shallow,
                domain: "mail.example".into()
            })
        );
    }
}
