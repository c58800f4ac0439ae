//! Error types for gymdesk.

use thiserror::Error;

use crate::db::SessionStatus;

/// Rejected input, caught before any rule or query runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("weight must be between {min} and {max} kg: {value}")]
    WeightOutOfRange { value: f64, min: f64, max: f64 },

    #[error("height must be between {min} and {max} m: {value}")]
    HeightOutOfRange { value: f64, min: f64, max: f64 },

    #[error("age must be between {min} and {max} years: {value}")]
    AgeOutOfRange { value: u32, min: u32, max: u32 },

    #[error("unknown gender: {0} (expected MALE or FEMALE)")]
    UnknownGender(String),

    #[error("unknown BMI status: {0}")]
    UnknownStatus(String),

    #[error("unknown session status: {0}")]
    UnknownSessionStatus(String),

    #[error("set weight must be zero or more: {0}")]
    NegativeLoad(f64),

    #[error("repetitions must be at least 1: {0}")]
    BadReps(u32),

    #[error("set number must be at least 1: {0}")]
    BadSetNumber(u32),

    #[error("total volume must be zero or more: {0}")]
    NegativeVolume(f64),

    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("unknown exercise category: {0} (expected push, pull, legs or core)")]
    UnknownCategory(String),

    #[error("unknown difficulty: {0} (expected BEGINNER, INTERMEDIATE or ADVANCED)")]
    UnknownDifficulty(String),

    #[error("plan exercise must look like exercise_id[:sets[:reps]]: {0}")]
    BadPlanExercise(String),

    #[error("plan title must not be empty")]
    EmptyTitle,

    #[error("planned sets must be at least 1: {0}")]
    BadPlanSets(u32),

    #[error("plan duration must be at least 1 week: {0}")]
    BadDuration(u32),

    #[error("a measurement needs at least one value")]
    EmptyMeasurement,

    #[error("{field} must be a positive number{limit}: {value}")]
    BadMeasurement {
        field: &'static str,
        value: f64,
        limit: &'static str,
    },
}

/// Errors surfaced by the recording service.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("BMI record not found or access denied: {0}")]
    BmiRecordNotFound(i64),

    #[error("session not found: {0}")]
    SessionNotFound(i64),

    #[error("workout plan not found: {0}")]
    PlanNotFound(i64),

    #[error("no active session for user {0}")]
    NoActiveSession(String),

    #[error("session {id} is {status}, not in progress")]
    SessionNotActive { id: i64, status: SessionStatus },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
