use chrono::Utc;
use tracing::info;

use super::Tracker;
use crate::db::{LoggedSet, NewSetLog, WorkoutSession};
use crate::error::{TrackerError, TrackerResult};
use crate::rules::PrRecord;
use crate::validation;

impl Tracker {
    /// Start a session, cancelling whatever the user still had in progress.
    /// A plan id must name a stored plan.
    pub fn start_session(
        &mut self,
        user_id: &str,
        workout_plan_id: Option<i64>,
        notes: Option<&str>,
    ) -> TrackerResult<WorkoutSession> {
        let (session, cancelled) = self.db.start_session(user_id, workout_plan_id, notes, Utc::now())?;
        if cancelled > 0 {
            info!(user_id, cancelled, "cancelled unfinished sessions");
        }
        info!(user_id, session_id = session.id, "session started");
        Ok(session)
    }

    /// Log a set into one of the user's in-progress sessions. Sessions of
    /// other users are reported as missing.
    pub fn log_set(
        &mut self,
        user_id: &str,
        session_id: i64,
        exercise_id: &str,
        set_number: u32,
        weight_kg: f64,
        reps: u32,
    ) -> TrackerResult<LoggedSet> {
        let exercise = validation::set_log(exercise_id, set_number, weight_kg, reps)?;

        let logged = self.db.log_set(
            session_id,
            user_id,
            &NewSetLog {
                exercise_id: exercise.id.to_string(),
                set_number,
                weight: weight_kg,
                reps,
            },
            Utc::now(),
        )?;

        if logged.new_record.is_some() {
            info!(user_id, exercise = exercise.id, weight_kg, reps, "new personal record");
        }
        Ok(logged)
    }

    /// Log a set into the user's current session
    pub fn log_set_active(
        &mut self,
        user_id: &str,
        exercise_id: &str,
        set_number: u32,
        weight_kg: f64,
        reps: u32,
    ) -> TrackerResult<LoggedSet> {
        let session = self
            .db
            .active_session(user_id)?
            .ok_or_else(|| TrackerError::NoActiveSession(user_id.to_string()))?;
        self.log_set(user_id, session.id, exercise_id, set_number, weight_kg, reps)
    }

    pub fn complete_session(
        &mut self,
        user_id: &str,
        session_id: i64,
        notes: Option<&str>,
        total_volume: Option<f64>,
    ) -> TrackerResult<WorkoutSession> {
        let total_volume = validation::total_volume(total_volume)?;
        let session = self
            .db
            .complete_session(session_id, user_id, notes, total_volume, Utc::now())?;
        info!(user_id, session_id, volume = session.total_volume, "session completed");
        Ok(session)
    }

    /// Complete the user's current session
    pub fn complete_active(
        &mut self,
        user_id: &str,
        notes: Option<&str>,
        total_volume: Option<f64>,
    ) -> TrackerResult<WorkoutSession> {
        let session = self
            .db
            .active_session(user_id)?
            .ok_or_else(|| TrackerError::NoActiveSession(user_id.to_string()))?;
        self.complete_session(user_id, session.id, notes, total_volume)
    }

    pub fn active_session(&self, user_id: &str) -> TrackerResult<Option<WorkoutSession>> {
        Ok(self.db.active_session(user_id)?)
    }

    pub fn session_history(&self, user_id: &str) -> TrackerResult<Vec<WorkoutSession>> {
        Ok(self.db.sessions_for_user(user_id)?)
    }

    pub fn personal_records(&self, user_id: &str) -> TrackerResult<Vec<PrRecord>> {
        Ok(self.db.personal_records(user_id)?)
    }

    pub fn personal_record(&self, user_id: &str, exercise_id: &str) -> TrackerResult<Option<PrRecord>> {
        Ok(self.db.personal_record(user_id, exercise_id)?)
    }
}
