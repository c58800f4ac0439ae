use chrono::Utc;
use tracing::{debug, info};

use super::Tracker;
use crate::db::{NewWorkoutPlan, PlanUpdate, WorkoutPlan};
use crate::error::{TrackerError, TrackerResult};
use crate::validation;

/// Training goal suited to a BMI category label
fn goal_for_category(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("overweight") || category.contains("obes") {
        "Weight Loss"
    } else if category.contains("underweight") {
        "Muscle Building"
    } else {
        "Fitness"
    }
}

impl Tracker {
    pub fn create_plan(&mut self, plan: NewWorkoutPlan) -> TrackerResult<WorkoutPlan> {
        validation::new_plan(&plan)?;
        let plan = NewWorkoutPlan {
            title: plan.title.trim().to_string(),
            ..plan
        };
        let stored = self.db.insert_plan(&plan, Utc::now())?;
        info!(plan_id = stored.id, title = %stored.title, exercises = stored.exercises.len(), "plan created");
        Ok(stored)
    }

    /// Active plans ordered by title
    pub fn plans(&self) -> TrackerResult<Vec<WorkoutPlan>> {
        Ok(self.db.active_plans()?)
    }

    pub fn plan(&self, plan_id: i64) -> TrackerResult<WorkoutPlan> {
        self.db.plan(plan_id)?.ok_or(TrackerError::PlanNotFound(plan_id))
    }

    pub fn update_plan(&mut self, plan_id: i64, update: PlanUpdate) -> TrackerResult<WorkoutPlan> {
        validation::plan_update(&update)?;
        let update = PlanUpdate {
            title: update.title.map(|t| t.trim().to_string()),
            ..update
        };
        let plan = self
            .db
            .update_plan(plan_id, &update)?
            .ok_or(TrackerError::PlanNotFound(plan_id))?;
        info!(plan_id, replaced_exercises = update.exercises.is_some(), "plan updated");
        Ok(plan)
    }

    pub fn delete_plan(&self, plan_id: i64) -> TrackerResult<()> {
        if !self.db.delete_plan(plan_id)? {
            return Err(TrackerError::PlanNotFound(plan_id));
        }
        info!(plan_id, "plan deleted");
        Ok(())
    }

    /// Active plans whose goal fits the user's latest BMI category.
    /// Without a BMI record every active plan is offered.
    pub fn recommended_plans(&self, user_id: &str) -> TrackerResult<Vec<WorkoutPlan>> {
        let Some(latest) = self.db.latest_bmi_record(user_id)? else {
            return self.plans();
        };
        let goal = goal_for_category(&latest.category);
        debug!(user_id, category = %latest.category, goal, "recommending plans");
        Ok(self.db.active_plans_for_goal(goal)?)
    }
}
