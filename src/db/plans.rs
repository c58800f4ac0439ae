//! Workout plans - titled templates holding an ordered list of exercises

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::Serialize;

use super::{optional_column, stored_time, timestamp_column, to_timestamp, Database};
use crate::error::ValidationError;
use crate::exercises::exercise_name;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BEGINNER" => Ok(Difficulty::Beginner),
            "INTERMEDIATE" => Ok(Difficulty::Intermediate),
            "ADVANCED" => Ok(Difficulty::Advanced),
            _ => Err(ValidationError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// One exercise slot of a stored plan
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanExercise {
    pub exercise_id: String,
    pub exercise_name: String,
    /// 1-based position within the plan
    pub position: u32,
    pub sets: Option<u32>,
    /// Free text such as "8-12" or "AMRAP"
    pub reps: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkoutPlan {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration_weeks: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<PlanExercise>,
}

/// Exercise slot to store; its position is its index in the list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlanExercise {
    pub exercise_id: String,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub notes: Option<String>,
}

/// Parses `exercise_id[:sets[:reps]]`, e.g. `back_squat:5:5`
impl FromStr for NewPlanExercise {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || ValidationError::BadPlanExercise(s.to_string());
        let mut parts = s.splitn(3, ':').map(str::trim);

        let exercise_id = parts.next().filter(|id| !id.is_empty()).ok_or_else(bad)?;
        let sets = match parts.next() {
            Some("") | None => None,
            Some(sets) => Some(sets.parse().map_err(|_| bad())?),
        };
        let reps = parts.next().filter(|r| !r.is_empty()).map(str::to_string);

        Ok(Self {
            exercise_id: exercise_id.to_string(),
            sets,
            reps,
            notes: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutPlan {
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration_weeks: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub is_active: bool,
    pub exercises: Vec<NewPlanExercise>,
}

/// Partial update. `exercises`, when given, replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration_weeks: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub is_active: Option<bool>,
    pub exercises: Option<Vec<NewPlanExercise>>,
}

const SELECT_PLAN: &str = "SELECT id, title, description, goal, duration_weeks, difficulty, \
                           is_active, created_at FROM workout_plans";

fn plan_from_row(row: &Row<'_>) -> Result<WorkoutPlan> {
    Ok(WorkoutPlan {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        goal: row.get(3)?,
        duration_weeks: row.get(4)?,
        difficulty: optional_column(row, 5)?,
        is_active: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
        exercises: Vec::new(),
    })
}

fn plan_exercise_from_row(row: &Row<'_>) -> Result<PlanExercise> {
    let exercise_id: String = row.get(0)?;
    Ok(PlanExercise {
        exercise_name: exercise_name(&exercise_id).to_string(),
        exercise_id,
        position: row.get(1)?,
        sets: row.get(2)?,
        reps: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn load_plan_exercises(conn: &Connection, plan_id: i64) -> Result<Vec<PlanExercise>> {
    let mut stmt = conn.prepare(
        "SELECT exercise_id, position, sets, reps, notes FROM workout_plan_exercises
         WHERE plan_id = ?1 ORDER BY position",
    )?;
    let exercises = stmt
        .query_map([plan_id], plan_exercise_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(exercises)
}

fn insert_plan_exercises(conn: &Connection, plan_id: i64, exercises: &[NewPlanExercise]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO workout_plan_exercises (plan_id, exercise_id, position, sets, reps, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (position, ex) in (1u32..).zip(exercises) {
        stmt.execute(params![plan_id, ex.exercise_id, position, ex.sets, ex.reps, ex.notes])?;
    }
    Ok(())
}

fn load_plans(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<WorkoutPlan>> {
    let mut stmt = conn.prepare(sql)?;
    let mut plans = stmt
        .query_map(params, plan_from_row)?
        .collect::<Result<Vec<_>>>()?;
    for plan in &mut plans {
        plan.exercises = load_plan_exercises(conn, plan.id)?;
    }
    Ok(plans)
}

pub(crate) fn plan_exists(conn: &Connection, plan_id: i64) -> Result<bool> {
    conn.query_row("SELECT EXISTS (SELECT 1 FROM workout_plans WHERE id = ?1)", [plan_id], |row| {
        row.get(0)
    })
}

impl Database {
    /// Store a plan with its exercises
    pub fn insert_plan(&mut self, plan: &NewWorkoutPlan, now: DateTime<Utc>) -> Result<WorkoutPlan> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO workout_plans (title, description, goal, duration_weeks, difficulty, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                plan.title,
                plan.description,
                plan.goal,
                plan.duration_weeks,
                plan.difficulty.map(|d| d.as_str()),
                plan.is_active,
                to_timestamp(stored_time(now)),
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_plan_exercises(&tx, id, &plan.exercises)?;
        tx.commit()?;

        self.plan(id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
    }

    pub fn plan(&self, plan_id: i64) -> Result<Option<WorkoutPlan>> {
        let plan = self
            .conn
            .query_row(&format!("{SELECT_PLAN} WHERE id = ?1"), [plan_id], plan_from_row)
            .optional()?;
        match plan {
            Some(mut plan) => {
                plan.exercises = load_plan_exercises(&self.conn, plan.id)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    /// Active plans ordered by title
    pub fn active_plans(&self) -> Result<Vec<WorkoutPlan>> {
        load_plans(
            &self.conn,
            &format!("{SELECT_PLAN} WHERE is_active = 1 ORDER BY title, id"),
            [],
        )
    }

    /// Active plans whose goal mentions `goal`, case-insensitively
    pub fn active_plans_for_goal(&self, goal: &str) -> Result<Vec<WorkoutPlan>> {
        load_plans(
            &self.conn,
            &format!(
                "{SELECT_PLAN} WHERE is_active = 1 AND goal IS NOT NULL
                 AND instr(lower(goal), lower(?1)) > 0 ORDER BY title, id"
            ),
            [goal],
        )
    }

    /// Apply an update; returns `None` when the plan does not exist
    pub fn update_plan(&mut self, plan_id: i64, update: &PlanUpdate) -> Result<Option<WorkoutPlan>> {
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE workout_plans SET
                 title = COALESCE(?1, title),
                 description = COALESCE(?2, description),
                 goal = COALESCE(?3, goal),
                 duration_weeks = COALESCE(?4, duration_weeks),
                 difficulty = COALESCE(?5, difficulty),
                 is_active = COALESCE(?6, is_active)
             WHERE id = ?7",
            params![
                update.title,
                update.description,
                update.goal,
                update.duration_weeks,
                update.difficulty.map(|d| d.as_str()),
                update.is_active,
                plan_id,
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        if let Some(exercises) = &update.exercises {
            tx.execute("DELETE FROM workout_plan_exercises WHERE plan_id = ?1", [plan_id])?;
            insert_plan_exercises(&tx, plan_id, exercises)?;
        }
        tx.commit()?;

        self.plan(plan_id)
    }

    /// Returns false when nothing matched. Sessions keep running without the plan.
    pub fn delete_plan(&self, plan_id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM workout_plans WHERE id = ?1", [plan_id])?;
        Ok(deleted > 0)
    }
}
