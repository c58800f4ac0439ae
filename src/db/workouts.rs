//! Workout sessions, set logs and the best-performance store

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row, TransactionBehavior};
use serde::Serialize;
use tracing::debug;

use super::plans::plan_exists;
use super::{optional_timestamp_column, parse_column, stored_time, timestamp_column, to_timestamp, Database};
use crate::error::{TrackerError, TrackerResult, ValidationError};
use crate::exercises::exercise_name;
use crate::rules::{evaluate, PrCandidate, PrRecord};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(SessionStatus::InProgress),
            "COMPLETED" => Ok(SessionStatus::Completed),
            "CANCELLED" => Ok(SessionStatus::Cancelled),
            _ => Err(ValidationError::UnknownSessionStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: String,
    pub workout_plan_id: Option<i64>,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub total_volume: Option<f64>,
    pub set_logs: Vec<SetLog>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetLog {
    pub id: i64,
    pub session_id: i64,
    pub exercise_id: String,
    pub exercise_name: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    pub is_personal_record: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated set waiting to be logged
#[derive(Debug, Clone)]
pub struct NewSetLog {
    pub exercise_id: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
}

/// Outcome of logging a set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoggedSet {
    pub set_log: SetLog,
    /// Best before this set was logged
    pub previous_best: Option<PrRecord>,
    /// Set when this set became the new best
    pub new_record: Option<PrRecord>,
}

const SELECT_SESSION: &str = "SELECT id, user_id, workout_plan_id, status, start_time, end_time, \
                              notes, total_volume FROM workout_sessions";

fn session_from_row(row: &Row<'_>) -> Result<WorkoutSession> {
    Ok(WorkoutSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        workout_plan_id: row.get(2)?,
        status: parse_column(row, 3)?,
        start_time: timestamp_column(row, 4)?,
        end_time: optional_timestamp_column(row, 5)?,
        notes: row.get(6)?,
        total_volume: row.get(7)?,
        set_logs: Vec::new(),
    })
}

fn set_log_from_row(row: &Row<'_>) -> Result<SetLog> {
    let exercise_id: String = row.get(2)?;
    Ok(SetLog {
        id: row.get(0)?,
        session_id: row.get(1)?,
        exercise_name: exercise_name(&exercise_id).to_string(),
        exercise_id,
        set_number: row.get(3)?,
        weight: row.get(4)?,
        reps: row.get(5)?,
        is_personal_record: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

fn pr_from_row(row: &Row<'_>) -> Result<PrRecord> {
    Ok(PrRecord {
        user_id: row.get(0)?,
        exercise_id: row.get(1)?,
        weight_kg: row.get(2)?,
        reps: row.get(3)?,
        recorded_at: timestamp_column(row, 4)?,
    })
}

fn load_set_logs(conn: &Connection, session_id: i64) -> Result<Vec<SetLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, exercise_id, set_number, weight, reps, is_personal_record, created_at
         FROM set_logs WHERE session_id = ?1 ORDER BY id",
    )?;
    let logs = stmt
        .query_map([session_id], set_log_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

fn load_session(conn: &Connection, session_id: i64) -> Result<Option<WorkoutSession>> {
    let session = conn
        .query_row(&format!("{SELECT_SESSION} WHERE id = ?1"), [session_id], session_from_row)
        .optional()?;
    match session {
        Some(mut session) => {
            session.set_logs = load_set_logs(conn, session.id)?;
            Ok(Some(session))
        }
        None => Ok(None),
    }
}

fn load_personal_record(conn: &Connection, user_id: &str, exercise_id: &str) -> Result<Option<PrRecord>> {
    conn.query_row(
        "SELECT user_id, exercise_id, weight, reps, recorded_at FROM user_prs
         WHERE user_id = ?1 AND exercise_id = ?2",
        [user_id, exercise_id],
        pr_from_row,
    )
    .optional()
}

/// The session must exist, belong to `user_id` and still be in progress.
/// Sessions of other users are reported as missing.
fn check_open_session(conn: &Connection, session_id: i64, user_id: &str) -> TrackerResult<()> {
    let found: Option<(String, SessionStatus)> = conn
        .query_row(
            "SELECT user_id, status FROM workout_sessions WHERE id = ?1",
            [session_id],
            |row| Ok((row.get(0)?, parse_column(row, 1)?)),
        )
        .optional()?;
    match found {
        Some((owner, status)) if owner == user_id => {
            if status != SessionStatus::InProgress {
                return Err(TrackerError::SessionNotActive { id: session_id, status });
            }
            Ok(())
        }
        _ => Err(TrackerError::SessionNotFound(session_id)),
    }
}

impl Database {
    /// Start a session; any session still in progress for the user is cancelled.
    /// Returns the new session and how many were cancelled.
    pub fn start_session(
        &mut self,
        user_id: &str,
        workout_plan_id: Option<i64>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> TrackerResult<(WorkoutSession, usize)> {
        let now = stored_time(now);
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(plan_id) = workout_plan_id
            && !plan_exists(&tx, plan_id)?
        {
            return Err(TrackerError::PlanNotFound(plan_id));
        }
        let started = to_timestamp(now);

        let cancelled = tx.execute(
            "UPDATE workout_sessions SET status = ?1, end_time = ?2
             WHERE user_id = ?3 AND status = ?4",
            params![
                SessionStatus::Cancelled.as_str(),
                started,
                user_id,
                SessionStatus::InProgress.as_str(),
            ],
        )?;

        tx.execute(
            "INSERT INTO workout_sessions (user_id, workout_plan_id, status, start_time, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, workout_plan_id, SessionStatus::InProgress.as_str(), started, notes],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok((
            WorkoutSession {
                id,
                user_id: user_id.to_string(),
                workout_plan_id,
                status: SessionStatus::InProgress,
                start_time: now,
                end_time: None,
                notes: notes.map(str::to_string),
                total_volume: None,
                set_logs: Vec::new(),
            },
            cancelled,
        ))
    }

    pub fn session(&self, session_id: i64) -> Result<Option<WorkoutSession>> {
        load_session(&self.conn, session_id)
    }

    /// Log a set and settle the personal record in one write transaction.
    ///
    /// The session check, and the read, comparison and replacement of the
    /// current best, all run while the database write lock is held, so
    /// concurrent sets for the same exercise cannot lose an update. The
    /// upsert repeats the comparison as a predicate.
    pub fn log_set(
        &mut self,
        session_id: i64,
        user_id: &str,
        set: &NewSetLog,
        now: DateTime<Utc>,
    ) -> TrackerResult<LoggedSet> {
        let now = stored_time(now);
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        check_open_session(&tx, session_id, user_id)?;
        let logged_at = to_timestamp(now);

        tx.execute(
            "INSERT INTO set_logs (session_id, exercise_id, set_number, weight, reps, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![session_id, set.exercise_id, set.set_number, set.weight, set.reps, logged_at],
        )?;
        let set_log_id = tx.last_insert_rowid();

        let previous_best = load_personal_record(&tx, user_id, &set.exercise_id)?;
        let candidate = PrCandidate {
            exercise_id: set.exercise_id.clone(),
            weight_kg: set.weight,
            reps: set.reps,
        };
        let decision = evaluate(user_id, &candidate, previous_best.as_ref(), now);

        let new_record = match decision.record_to_persist() {
            Some(record) => {
                tx.execute(
                    "INSERT INTO user_prs (user_id, exercise_id, weight, reps, recorded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT (user_id, exercise_id) DO UPDATE SET
                         weight = excluded.weight,
                         reps = excluded.reps,
                         recorded_at = excluded.recorded_at
                     WHERE excluded.weight > user_prs.weight
                        OR (excluded.weight = user_prs.weight AND excluded.reps > user_prs.reps)",
                    params![
                        record.user_id,
                        record.exercise_id,
                        record.weight_kg,
                        record.reps,
                        to_timestamp(record.recorded_at),
                    ],
                )?;
                tx.execute(
                    "UPDATE set_logs SET is_personal_record = 1 WHERE id = ?1",
                    [set_log_id],
                )?;
                Some(record.clone())
            }
            None => None,
        };

        tx.commit()?;
        debug!(session_id, set_log_id, is_pr = decision.is_new_record(), "set logged");

        Ok(LoggedSet {
            set_log: SetLog {
                id: set_log_id,
                session_id,
                exercise_id: set.exercise_id.clone(),
                exercise_name: exercise_name(&set.exercise_id).to_string(),
                set_number: set.set_number,
                weight: set.weight,
                reps: set.reps,
                is_personal_record: new_record.is_some(),
                created_at: now,
            },
            previous_best,
            new_record,
        })
    }

    /// Mark one of the user's in-progress sessions completed. Without an
    /// explicit volume, the total is the sum of weight × reps over its sets.
    pub fn complete_session(
        &mut self,
        session_id: i64,
        user_id: &str,
        notes: Option<&str>,
        total_volume: Option<f64>,
        now: DateTime<Utc>,
    ) -> TrackerResult<WorkoutSession> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        check_open_session(&tx, session_id, user_id)?;

        let total_volume = match total_volume {
            Some(volume) => volume,
            None => tx.query_row(
                "SELECT COALESCE(SUM(weight * reps), 0.0) FROM set_logs WHERE session_id = ?1",
                [session_id],
                |row| row.get(0),
            )?,
        };

        tx.execute(
            "UPDATE workout_sessions
             SET status = ?1, end_time = ?2, notes = COALESCE(?3, notes), total_volume = ?4
             WHERE id = ?5",
            params![
                SessionStatus::Completed.as_str(),
                to_timestamp(now),
                notes,
                total_volume,
                session_id,
            ],
        )?;
        let session = load_session(&tx, session_id)?.ok_or(TrackerError::SessionNotFound(session_id))?;
        tx.commit()?;
        Ok(session)
    }

    /// The user's in-progress session, with its sets
    pub fn active_session(&self, user_id: &str) -> Result<Option<WorkoutSession>> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM workout_sessions WHERE user_id = ?1 AND status = ?2
                 ORDER BY start_time DESC, id DESC LIMIT 1",
                [user_id, SessionStatus::InProgress.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => load_session(&self.conn, id),
            None => Ok(None),
        }
    }

    /// All sessions of a user, newest first, with their sets
    pub fn sessions_for_user(&self, user_id: &str) -> Result<Vec<WorkoutSession>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_SESSION} WHERE user_id = ?1 ORDER BY start_time DESC, id DESC"
        ))?;
        let mut sessions = stmt
            .query_map([user_id], session_from_row)?
            .collect::<Result<Vec<_>>>()?;
        for session in &mut sessions {
            session.set_logs = load_set_logs(&self.conn, session.id)?;
        }
        Ok(sessions)
    }

    pub fn personal_record(&self, user_id: &str, exercise_id: &str) -> Result<Option<PrRecord>> {
        load_personal_record(&self.conn, user_id, exercise_id)
    }

    /// Current bests of a user, most recently set first
    pub fn personal_records(&self, user_id: &str) -> Result<Vec<PrRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, exercise_id, weight, reps, recorded_at FROM user_prs
             WHERE user_id = ?1 ORDER BY recorded_at DESC, exercise_id",
        )?;
        let records = stmt
            .query_map([user_id], pr_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewPlanExercise, NewWorkoutPlan};
    use chrono::Duration;
    use std::thread;

    fn set(exercise_id: &str, set_number: u32, weight: f64, reps: u32) -> NewSetLog {
        NewSetLog {
            exercise_id: exercise_id.to_string(),
            set_number,
            weight,
            reps,
        }
    }

    fn push_plan(db: &mut Database) -> i64 {
        let plan = NewWorkoutPlan {
            title: "Push Day".to_string(),
            description: None,
            goal: None,
            duration_weeks: None,
            difficulty: None,
            is_active: true,
            exercises: vec![NewPlanExercise {
                exercise_id: "bench_press".to_string(),
                ..Default::default()
            }],
        };
        db.insert_plan(&plan, Utc::now()).unwrap().id
    }

    #[test]
    fn test_start_session_cancels_previous() {
        let mut db = Database::open_in_memory().unwrap();
        let plan_id = push_plan(&mut db);
        let (first, cancelled) = db.start_session("u1", None, None, Utc::now()).unwrap();
        assert_eq!(cancelled, 0);
        let (second, cancelled) = db
            .start_session("u1", Some(plan_id), Some("heavy"), Utc::now())
            .unwrap();
        assert_eq!(cancelled, 1);

        let first = db.session(first.id).unwrap().unwrap();
        assert_eq!(first.status, SessionStatus::Cancelled);
        assert!(first.end_time.is_some());

        let active = db.active_session("u1").unwrap().unwrap();
        assert_eq!(active, second);
        assert_eq!(active.workout_plan_id, Some(plan_id));
    }

    #[test]
    fn test_start_session_requires_existing_plan() {
        let mut db = Database::open_in_memory().unwrap();
        let (running, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        assert!(matches!(
            db.start_session("u1", Some(77), None, Utc::now()),
            Err(TrackerError::PlanNotFound(77))
        ));
        // nothing was cancelled by the rejected start
        assert_eq!(db.active_session("u1").unwrap().unwrap().id, running.id);
    }

    #[test]
    fn test_deleting_plan_detaches_sessions() {
        let mut db = Database::open_in_memory().unwrap();
        let plan_id = push_plan(&mut db);
        let (session, _) = db.start_session("u1", Some(plan_id), None, Utc::now()).unwrap();
        assert!(db.delete_plan(plan_id).unwrap());
        assert_eq!(db.session(session.id).unwrap().unwrap().workout_plan_id, None);
    }

    #[test]
    fn test_start_session_leaves_other_users_alone() {
        let mut db = Database::open_in_memory().unwrap();
        let (other, _) = db.start_session("u2", None, None, Utc::now()).unwrap();
        db.start_session("u1", None, None, Utc::now()).unwrap();
        assert_eq!(db.session(other.id).unwrap().unwrap().status, SessionStatus::InProgress);
    }

    #[test]
    fn test_log_set_tracks_personal_record() {
        let mut db = Database::open_in_memory().unwrap();
        let (session, _) = db.start_session("u1", None, None, Utc::now()).unwrap();

        let first = db.log_set(session.id, "u1", &set("bench_press", 1, 100.0, 5), Utc::now()).unwrap();
        assert!(first.set_log.is_personal_record);
        assert!(first.previous_best.is_none());
        assert_eq!(first.set_log.exercise_name, "Bench Press");

        let same = db.log_set(session.id, "u1", &set("bench_press", 2, 100.0, 5), Utc::now()).unwrap();
        assert!(!same.set_log.is_personal_record);
        assert_eq!(same.previous_best.as_ref().unwrap().reps, 5);

        let lighter = db.log_set(session.id, "u1", &set("bench_press", 3, 90.0, 12), Utc::now()).unwrap();
        assert!(!lighter.set_log.is_personal_record);

        let heavier = db.log_set(session.id, "u1", &set("bench_press", 4, 110.0, 3), Utc::now()).unwrap();
        assert!(heavier.set_log.is_personal_record);

        let best = db.personal_record("u1", "bench_press").unwrap().unwrap();
        assert_eq!(best.weight_kg, 110.0);
        assert_eq!(best.reps, 3);

        let stored = db.session(session.id).unwrap().unwrap();
        let flags: Vec<bool> = stored.set_logs.iter().map(|s| s.is_personal_record).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn test_returned_values_match_stored_rows() {
        let mut db = Database::open_in_memory().unwrap();
        let (session, _) = db.start_session("u1", None, Some("am"), Utc::now()).unwrap();
        assert_eq!(db.session(session.id).unwrap().unwrap(), session);

        let logged = db.log_set(session.id, "u1", &set("deadlift", 1, 200.0, 2), Utc::now()).unwrap();
        let stored = db.session(session.id).unwrap().unwrap();
        assert_eq!(stored.set_logs, vec![logged.set_log.clone()]);
        assert_eq!(db.personal_record("u1", "deadlift").unwrap(), logged.new_record);
    }

    #[test]
    fn test_log_set_checks_session_inside_transaction() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.log_set(5, "u1", &set("bench_press", 1, 60.0, 8), Utc::now()),
            Err(TrackerError::SessionNotFound(5))
        ));

        let (session, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        assert!(matches!(
            db.log_set(session.id, "u2", &set("bench_press", 1, 60.0, 8), Utc::now()),
            Err(TrackerError::SessionNotFound(_))
        ));

        db.start_session("u1", None, None, Utc::now()).unwrap();
        assert!(matches!(
            db.log_set(session.id, "u1", &set("bench_press", 1, 60.0, 8), Utc::now()),
            Err(TrackerError::SessionNotActive { status: SessionStatus::Cancelled, .. })
        ));

        // rejected sets leave no trace
        assert!(db.session(session.id).unwrap().unwrap().set_logs.is_empty());
        assert!(db.personal_records("u1").unwrap().is_empty());
    }

    #[test]
    fn test_one_record_per_user_and_exercise() {
        let mut db = Database::open_in_memory().unwrap();
        let (session, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        for (n, reps) in [5, 6, 7].into_iter().enumerate() {
            db.log_set(session.id, "u1", &set("back_squat", n as u32 + 1, 140.0, reps), Utc::now())
                .unwrap();
        }
        db.log_set(session.id, "u1", &set("deadlift", 1, 180.0, 3), Utc::now()).unwrap();

        let records = db.personal_records("u1").unwrap();
        assert_eq!(records.len(), 2);
        let squat = records.iter().find(|r| r.exercise_id == "back_squat").unwrap();
        assert_eq!(squat.reps, 7);
        assert!(db.personal_records("u2").unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_sets_keep_heaviest() {
        const WRITERS: u32 = 8;
        const SETS_EACH: u32 = 25;

        let path = std::env::temp_dir().join(format!(
            "gymdesk-concurrent-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let session_id = {
            let mut db = Database::open(&path).unwrap();
            db.start_session("u1", None, None, Utc::now()).unwrap().0.id
        };

        let writers: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let path = path.clone();
                thread::spawn(move || {
                    let mut db = Database::open(&path).unwrap();
                    for n in 0..SETS_EACH {
                        // every weight 0..200 is logged exactly once across writers
                        let weight = f64::from(n * WRITERS + writer);
                        db.log_set(session_id, "u1", &set("back_squat", n + 1, weight, 5), Utc::now())
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let db = Database::open(&path).unwrap();
        let best = db.personal_record("u1", "back_squat").unwrap().unwrap();
        assert_eq!(best.weight_kg, f64::from(WRITERS * SETS_EACH - 1));
        assert_eq!(db.personal_records("u1").unwrap().len(), 1);

        let session = db.session(session_id).unwrap().unwrap();
        assert_eq!(session.set_logs.len(), (WRITERS * SETS_EACH) as usize);
        // the flagged sets, in log order, form a strictly rising chain ending at the best
        let flagged: Vec<f64> = session
            .set_logs
            .iter()
            .filter(|s| s.is_personal_record)
            .map(|s| s.weight)
            .collect();
        assert!(flagged.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(flagged.last().copied(), Some(best.weight_kg));

        drop(db);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_complete_session_sums_volume() {
        let mut db = Database::open_in_memory().unwrap();
        let (session, _) = db.start_session("u1", None, Some("start"), Utc::now()).unwrap();
        db.log_set(session.id, "u1", &set("bench_press", 1, 100.0, 5), Utc::now()).unwrap();
        db.log_set(session.id, "u1", &set("bench_press", 2, 80.0, 10), Utc::now()).unwrap();

        let done = db.complete_session(session.id, "u1", None, None, Utc::now()).unwrap();
        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(done.total_volume, Some(1300.0));
        assert_eq!(done.notes.as_deref(), Some("start"));
        assert_eq!(done.set_logs.len(), 2);
        assert!(db.active_session("u1").unwrap().is_none());
    }

    #[test]
    fn test_complete_session_explicit_volume_and_empty() {
        let mut db = Database::open_in_memory().unwrap();
        let (session, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        let done = db
            .complete_session(session.id, "u1", Some("easy"), Some(42.0), Utc::now())
            .unwrap();
        assert_eq!(done.total_volume, Some(42.0));
        assert_eq!(done.notes.as_deref(), Some("easy"));

        let (empty, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        let done = db.complete_session(empty.id, "u1", None, None, Utc::now()).unwrap();
        assert_eq!(done.total_volume, Some(0.0));

        assert!(matches!(
            db.complete_session(9999, "u1", None, None, Utc::now()),
            Err(TrackerError::SessionNotFound(9999))
        ));
        assert!(matches!(
            db.complete_session(empty.id, "u1", None, None, Utc::now()),
            Err(TrackerError::SessionNotActive { status: SessionStatus::Completed, .. })
        ));
    }

    #[test]
    fn test_history_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        let (older, _) = db
            .start_session("u1", None, None, Utc::now() - Duration::days(1))
            .unwrap();
        db.complete_session(older.id, "u1", None, None, Utc::now()).unwrap();
        let (newer, _) = db.start_session("u1", None, None, Utc::now()).unwrap();
        db.log_set(newer.id, "u1", &set("dip", 1, 0.0, 12), Utc::now()).unwrap();

        let history = db.sessions_for_user("u1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, newer.id);
        assert_eq!(history[0].set_logs.len(), 1);
        assert_eq!(history[1].id, older.id);
    }
}
