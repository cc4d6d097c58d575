//! Time source for handlers and tests.
//!
//! Every periodic check and date-stamped mutation reads time through the
//! `Clock` trait so tests can drive the schedule with a `ManualClock`.
//! Wall-clock components (weekday, hour, day buckets) come from
//! `local_now()`; instants that get persisted or compared across runs are
//! UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time, used for schedule windows and day bucketing.
    fn local_now(&self) -> NaiveDateTime;

    /// Map a wall-clock time back to an instant.
    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc>;

    /// Calendar date used for day-bucketed logs and once-per-day stamps.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // Ambiguous/skipped local times (DST transitions) fall back to
        // reading the naive value as UTC.
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local))
    }
}

/// Fixed clock for tests. Wall-clock time is the UTC instant's naive value,
/// so test schedules read exactly as written.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock();
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&local)
    }
}
