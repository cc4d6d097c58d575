//! Application-wide constants
//!
//! Centralized location for magic strings that are used across multiple
//! modules: storage keys, notification ids, and dashboard anchors.

/// Storage keys, one JSON document per feature plus settings and the
/// first-run marker.
pub mod keys {
    pub const SETTINGS: &str = "pop_settings";
    pub const FIRST_RUN: &str = "pop_first_run";
    pub const COGNITIVE_OFFLOAD: &str = "pop_cognitive_offload";
    pub const CASH_FLOW: &str = "pop_cash_flow";
    pub const NET_WORTH: &str = "pop_net_worth";
    pub const STOCK_WATCHLIST: &str = "pop_stock_watchlist";
    pub const PURPOSE_GATEKEEPER: &str = "pop_purpose_gatekeeper";
    pub const DAILY_NEGOTIATOR: &str = "pop_daily_negotiator";
    pub const QUESTION_PRIMER: &str = "pop_question_primer";
    pub const FLOW_THERMOMETER: &str = "pop_flow_thermometer";
    pub const TRUTH_LOGGER: &str = "pop_truth_logger";
    pub const TAB_SNOOZER: &str = "pop_tab_snoozer";
    pub const MASTERY_GRAPH: &str = "pop_mastery_graph";
    pub const DIGITAL_CLEANER: &str = "pop_digital_cleaner";
    pub const WEEKLY_REVIEW: &str = "pop_weekly_review";
    pub const LIFE_CALCULATOR: &str = "pop_life_calculator";

    /// Every feature document key (settings included, first-run marker not).
    pub const ALL: [&str; 15] = [
        SETTINGS,
        COGNITIVE_OFFLOAD,
        CASH_FLOW,
        NET_WORTH,
        STOCK_WATCHLIST,
        PURPOSE_GATEKEEPER,
        DAILY_NEGOTIATOR,
        QUESTION_PRIMER,
        FLOW_THERMOMETER,
        TRUTH_LOGGER,
        TAB_SNOOZER,
        MASTERY_GRAPH,
        DIGITAL_CLEANER,
        WEEKLY_REVIEW,
        LIFE_CALCULATOR,
    ];
}

/// Fixed notification ids. At most one notification per id is visible at a
/// time; a second delivery with the same id replaces the first.
pub mod notifications {
    pub const FLOW_CHECK: &str = "flowCheck";
    pub const TAB_AWAKE: &str = "tabAwake";
    pub const WEEKLY_REVIEW: &str = "weeklyReview";
}

/// Dashboard anchors, one per feature panel.
pub mod anchors {
    pub const COGNITIVE_OFFLOAD: &str = "cognitive-offload";
    pub const CASH_FLOW: &str = "cash-flow";
    pub const NET_WORTH: &str = "net-worth";
    pub const STOCK_WATCHLIST: &str = "stock-watchlist";
    pub const DAILY_NEGOTIATOR: &str = "daily-negotiator";
    pub const QUESTION_PRIMER: &str = "question-primer";
    pub const FLOW_THERMOMETER: &str = "flow-thermometer";
    pub const TRUTH_LOGGER: &str = "truth-logger";
    pub const WEEKLY_REVIEW: &str = "weekly-review";
}

/// Socket file name inside the data directory.
pub const SOCKET_NAME: &str = "pop.sock";

/// Pid file name inside the data directory.
pub const PID_FILE: &str = "daemon.pid";

/// Default dashboard URL opened for `openDashboard` and command dispatch.
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:7843/dashboard";

/// Minutes a flow-check "Pause 30min" button press pauses check-ins for.
pub const FLOW_PAUSE_MINUTES: i64 = 30;
