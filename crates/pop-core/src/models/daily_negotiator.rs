//! Morning planner balancing hard tasks and rewards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    pub id: String,
    pub text: String,
    pub is_hard: bool,
    pub reward: bool,
    pub completed: bool,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub id: String,
    pub date: NaiveDate,
    pub ideal_day: String,
    pub tasks: Vec<PlanTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyNegotiator {
    pub plans: Vec<DailyPlan>,
    pub last_prompt_date: Option<NaiveDate>,
}

impl Document for DailyNegotiator {
    const KEY: &'static str = keys::DAILY_NEGOTIATOR;
}

impl DailyNegotiator {
    pub fn today_plan(&mut self, today: NaiveDate) -> Option<&mut DailyPlan> {
        self.plans.iter_mut().find(|p| p.date == today)
    }

    pub fn create_today_plan(&mut self, ideal_day: String, today: NaiveDate) -> &mut DailyPlan {
        let plan = DailyPlan {
            id: new_id(),
            date: today,
            ideal_day,
            tasks: Vec::new(),
        };
        self.plans.insert(0, plan);
        self.last_prompt_date = Some(today);
        &mut self.plans[0]
    }

    /// Append a task to today's plan, creating the plan on first use.
    pub fn add_task(
        &mut self,
        text: String,
        is_hard: bool,
        is_reward: bool,
        today: NaiveDate,
    ) -> PlanTask {
        let idx = match self.plans.iter().position(|p| p.date == today) {
            Some(idx) => idx,
            None => {
                self.create_today_plan("A productive day".into(), today);
                0
            }
        };
        let plan = &mut self.plans[idx];
        let task = PlanTask {
            id: new_id(),
            text,
            is_hard,
            reward: is_reward,
            completed: false,
            order: plan.tasks.len(),
        };
        plan.tasks.push(task.clone());
        task
    }

    pub fn toggle_task(&mut self, task_id: &str, today: NaiveDate) -> bool {
        let Some(plan) = self.today_plan(today) else {
            return false;
        };
        match plan.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete_task(&mut self, task_id: &str, today: NaiveDate) {
        if let Some(plan) = self.today_plan(today) {
            plan.tasks.retain(|t| t.id != task_id);
        }
    }
}
