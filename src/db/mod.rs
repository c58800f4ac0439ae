//! Database module - SQLite storage for health records, body measurements,
//! workout plans, workout sessions and personal records

mod bmi;
mod measurements;
mod plans;
mod workouts;

pub use bmi::{BmiRecord, BmiStats, NewBmiRecord};
pub use measurements::{BodyMeasurement, NewMeasurement};
pub use plans::{Difficulty, NewPlanExercise, NewWorkoutPlan, PlanExercise, PlanUpdate, WorkoutPlan};
pub use workouts::{LoggedSet, NewSetLog, SessionStatus, SetLog, WorkoutSession};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row};
use tracing::debug;

/// Writers queue behind each other instead of failing with SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        debug!(path = %path.as_ref().display(), "opened database");
        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS bmi_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL,
                height REAL NOT NULL,
                weight REAL NOT NULL,
                bmi_value REAL NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_bmi_records_user
                ON bmi_records (user_id, created_at);

            CREATE TABLE IF NOT EXISTS body_measurements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                weight REAL,
                body_fat REAL,
                waist REAL,
                chest REAL,
                arms REAL,
                legs REAL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_body_measurements_user
                ON body_measurements (user_id, created_at);

            CREATE TABLE IF NOT EXISTS workout_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                goal TEXT,
                duration_weeks INTEGER,
                difficulty TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS workout_plan_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plan_id INTEGER NOT NULL REFERENCES workout_plans (id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                sets INTEGER,
                reps TEXT,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_workout_plan_exercises_plan
                ON workout_plan_exercises (plan_id, position);

            CREATE TABLE IF NOT EXISTS workout_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                workout_plan_id INTEGER REFERENCES workout_plans (id) ON DELETE SET NULL,
                status TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                notes TEXT,
                total_volume REAL
            );
            CREATE INDEX IF NOT EXISTS idx_workout_sessions_user
                ON workout_sessions (user_id, status);

            CREATE TABLE IF NOT EXISTS set_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES workout_sessions (id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL,
                set_number INTEGER NOT NULL,
                weight REAL NOT NULL,
                reps INTEGER NOT NULL,
                is_personal_record INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_set_logs_session ON set_logs (session_id);

            CREATE TABLE IF NOT EXISTS user_prs (
                user_id TEXT NOT NULL,
                exercise_id TEXT NOT NULL,
                weight REAL NOT NULL,
                reps INTEGER NOT NULL,
                recorded_at TEXT NOT NULL,
                PRIMARY KEY (user_id, exercise_id)
            );",
        )
    }
}

/// Timestamps are stored with microsecond precision; values handed back
/// to callers are cut to the same precision so they equal a later read.
pub(crate) fn stored_time(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(crate) fn to_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|d| d.with_timezone(&Utc))
}

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Read a TEXT timestamp column; a malformed date is an error, not "now"
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>> {
    let value: String = row.get(idx)?;
    parse_timestamp(&value).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn optional_timestamp_column(row: &Row<'_>, idx: usize) -> Result<Option<DateTime<Utc>>> {
    let value: Option<String> = row.get(idx)?;
    value
        .map(|v| parse_timestamp(&v).map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

/// Read a TEXT column into an enum that parses from its stored name
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.get(idx)?;
    value.parse().map_err(|e| conversion_failure(idx, e))
}

/// Nullable variant of [`parse_column`]
pub(crate) fn optional_column<T>(row: &Row<'_>, idx: usize) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: Option<String> = row.get(idx)?;
    value
        .map(|v| v.parse().map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let db = Database::open_in_memory().unwrap();
        let tables: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('bmi_records', 'body_measurements', 'workout_plans',
                              'workout_plan_exercises', 'workout_sessions', 'set_logs', 'user_prs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 7);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();
    }

    #[test]
    fn test_timestamp_round_trip_and_order() {
        let early = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let late = early + chrono::Duration::milliseconds(1500);
        assert_eq!(parse_timestamp(&to_timestamp(early)).unwrap(), early);
        assert!(to_timestamp(early) < to_timestamp(late));
    }

    #[test]
    fn test_stored_time_survives_round_trip() {
        let now = Utc::now();
        let stored = stored_time(now);
        assert_eq!(parse_timestamp(&to_timestamp(now)).unwrap(), stored);
        assert_eq!(stored_time(stored), stored);
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let read = |value: &str| {
            db.conn
                .query_row("SELECT ?1", [value], |row| timestamp_column(row, 0))
        };
        assert!(read("2026-01-02T03:04:05.000000Z").is_ok());
        assert!(matches!(
            read("yesterday"),
            Err(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }
}
