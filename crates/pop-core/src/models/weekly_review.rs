//! Weekly review prompts and the schedule window that gates them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewSchedule {
    /// Day of week, 0 = Sunday.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub dismissible: bool,
    pub duration_minutes: u32,
}

impl Default for ReviewSchedule {
    fn default() -> Self {
        // Friday 4 PM
        Self { day: 5, hour: 16, minute: 0, dismissible: true, duration_minutes: 15 }
    }
}

impl ReviewSchedule {
    /// The check runs on a coarse timer, so the match window is hour-wide:
    /// the scheduled weekday and hour, any minute from the configured one on.
    pub fn window_matches(&self, local: NaiveDateTime) -> bool {
        local.weekday().num_days_from_sunday() == self.day
            && local.hour() == self.hour
            && local.minute() >= self.minute
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyReview {
    pub reviews: Vec<Review>,
    pub questions: Vec<String>,
    pub schedule: ReviewSchedule,
    pub last_prompt_date: Option<NaiveDate>,
}

impl Default for WeeklyReview {
    fn default() -> Self {
        Self {
            reviews: Vec::new(),
            questions: vec![
                "What went well this week?".into(),
                "What could have gone better?".into(),
                "What is the 80/20 of next week?".into(),
                "What am I avoiding?".into(),
                "What would make next week great?".into(),
            ],
            schedule: ReviewSchedule::default(),
            last_prompt_date: None,
        }
    }
}

impl Document for WeeklyReview {
    const KEY: &'static str = keys::WEEKLY_REVIEW;
}

impl WeeklyReview {
    pub fn save_review(
        &mut self,
        responses: Vec<String>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Review {
        let review = Review { id: new_id(), date: now, responses };
        self.reviews.insert(0, review.clone());
        self.last_prompt_date = Some(today);
        review
    }
}
