//! Inputs for the life-calendar panel. Pure data; the derived metrics live
//! in the dashboard rendering, not here.

use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifeCalculator {
    pub dob: String,
    pub expected_lifespan: u32,
    pub weekly_hours: u32,
    pub net_worth: f64,
    pub monthly_spending: f64,
    pub monthly_savings: f64,
    pub show_inputs: bool,
}

impl Default for LifeCalculator {
    fn default() -> Self {
        Self {
            dob: String::new(),
            expected_lifespan: 85,
            weekly_hours: 112,
            net_worth: 0.0,
            monthly_spending: 0.0,
            monthly_savings: 0.0,
            show_inputs: true,
        }
    }
}

impl Document for LifeCalculator {
    const KEY: &'static str = keys::LIFE_CALCULATOR;
}
