//! Boundary checks applied before the rules engine or storage sees input

use std::ops::RangeInclusive;

use crate::db::{NewMeasurement, NewPlanExercise, NewWorkoutPlan, PlanUpdate};
use crate::error::ValidationError;
use crate::exercises::{find_exercise, Exercise};
use crate::rules::{BmiInput, Gender};

pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 1.0..=500.0;
pub const HEIGHT_RANGE_M: RangeInclusive<f64> = 0.5..=3.0;
pub const AGE_RANGE_YEARS: RangeInclusive<u32> = 1..=150;

/// Build a classifier input, rejecting anything outside the accepted bounds
pub fn bmi_input(
    weight_kg: f64,
    height_m: f64,
    age_years: u32,
    gender: Gender,
) -> Result<BmiInput, ValidationError> {
    // RangeInclusive::contains is false for NaN
    if !WEIGHT_RANGE_KG.contains(&weight_kg) {
        return Err(ValidationError::WeightOutOfRange {
            value: weight_kg,
            min: *WEIGHT_RANGE_KG.start(),
            max: *WEIGHT_RANGE_KG.end(),
        });
    }
    if !HEIGHT_RANGE_M.contains(&height_m) {
        return Err(ValidationError::HeightOutOfRange {
            value: height_m,
            min: *HEIGHT_RANGE_M.start(),
            max: *HEIGHT_RANGE_M.end(),
        });
    }
    if !AGE_RANGE_YEARS.contains(&age_years) {
        return Err(ValidationError::AgeOutOfRange {
            value: age_years,
            min: *AGE_RANGE_YEARS.start(),
            max: *AGE_RANGE_YEARS.end(),
        });
    }

    Ok(BmiInput {
        weight_kg,
        height_m,
        age_years,
        gender,
    })
}

/// Check a set before it is logged; returns the catalog entry it refers to
pub fn set_log(
    exercise_id: &str,
    set_number: u32,
    weight_kg: f64,
    reps: u32,
) -> Result<&'static Exercise, ValidationError> {
    let exercise = find_exercise(exercise_id)
        .ok_or_else(|| ValidationError::UnknownExercise(exercise_id.to_string()))?;

    if !(weight_kg >= 0.0 && weight_kg.is_finite()) {
        return Err(ValidationError::NegativeLoad(weight_kg));
    }
    if reps == 0 {
        return Err(ValidationError::BadReps(reps));
    }
    if set_number == 0 {
        return Err(ValidationError::BadSetNumber(set_number));
    }

    Ok(exercise)
}

pub fn total_volume(volume: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match volume {
        Some(v) if !(v >= 0.0 && v.is_finite()) => Err(ValidationError::NegativeVolume(v)),
        other => Ok(other),
    }
}

fn plan_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

fn plan_duration(weeks: Option<u32>) -> Result<(), ValidationError> {
    match weeks {
        Some(0) => Err(ValidationError::BadDuration(0)),
        _ => Ok(()),
    }
}

fn plan_exercises(exercises: &[NewPlanExercise]) -> Result<(), ValidationError> {
    for ex in exercises {
        if find_exercise(&ex.exercise_id).is_none() {
            return Err(ValidationError::UnknownExercise(ex.exercise_id.clone()));
        }
        if ex.sets == Some(0) {
            return Err(ValidationError::BadPlanSets(0));
        }
    }
    Ok(())
}

pub fn new_plan(plan: &NewWorkoutPlan) -> Result<(), ValidationError> {
    plan_title(&plan.title)?;
    plan_duration(plan.duration_weeks)?;
    plan_exercises(&plan.exercises)
}

/// Only the fields present in the update are checked
pub fn plan_update(update: &PlanUpdate) -> Result<(), ValidationError> {
    if let Some(title) = &update.title {
        plan_title(title)?;
    }
    plan_duration(update.duration_weeks)?;
    match &update.exercises {
        Some(exercises) => plan_exercises(exercises),
        None => Ok(()),
    }
}

/// At least one value; every value positive, body fat at most 100 %
pub fn measurement(m: &NewMeasurement) -> Result<(), ValidationError> {
    if m.is_empty() {
        return Err(ValidationError::EmptyMeasurement);
    }
    for (field, value) in m.fields() {
        let Some(value) = value else { continue };
        let (ok, limit) = match field {
            "body_fat" => (value > 0.0 && value <= 100.0, " up to 100"),
            _ => (value > 0.0 && value.is_finite(), ""),
        };
        if !ok {
            return Err(ValidationError::BadMeasurement { field, value, limit });
        }
    }
    Ok(())
}
