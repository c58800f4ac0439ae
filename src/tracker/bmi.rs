use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::Tracker;
use crate::db::{BmiRecord, BmiStats, NewBmiRecord};
use crate::error::{TrackerError, TrackerResult, ValidationError};
use crate::rules::{assess, BmiInput, BmiResult, BmiStatus, Gender};
use crate::validation;

/// Computed but not stored
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BmiCalculation {
    #[serde(flatten)]
    pub result: BmiResult,
    pub input: BmiInput,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordedBmi {
    #[serde(flatten)]
    pub record: BmiRecord,
    pub recommendation: &'static str,
}

/// Validate and classify without persisting anything
pub fn calculate(
    weight_kg: f64,
    height_m: f64,
    age_years: u32,
    gender: Gender,
) -> Result<BmiCalculation, ValidationError> {
    let input = validation::bmi_input(weight_kg, height_m, age_years, gender)?;
    Ok(BmiCalculation {
        result: assess(&input),
        input,
    })
}

impl Tracker {
    pub fn record_bmi(
        &self,
        user_id: &str,
        weight_kg: f64,
        height_m: f64,
        age_years: u32,
        gender: Gender,
    ) -> TrackerResult<RecordedBmi> {
        let BmiCalculation { result, input } = calculate(weight_kg, height_m, age_years, gender)?;

        let record = self.db.insert_bmi_record(&NewBmiRecord {
            user_id: user_id.to_string(),
            age: input.age_years,
            gender: input.gender,
            height: input.height_m,
            weight: input.weight_kg,
            bmi_value: result.bmi_value,
            category: result.category.to_string(),
            status: result.status,
            notes: Some(result.recommendation.to_string()),
            created_at: Utc::now(),
        })?;

        if result.status == BmiStatus::NotOk {
            warn!(user_id, id = record.id, category = result.category, "BMI recorded outside healthy range");
        } else {
            info!(user_id, id = record.id, bmi = result.bmi_value, category = result.category, "BMI recorded");
        }

        Ok(RecordedBmi {
            record,
            recommendation: result.recommendation,
        })
    }

    pub fn list_bmi(&self, user_id: &str) -> TrackerResult<Vec<BmiRecord>> {
        Ok(self.db.bmi_records_for_user(user_id)?)
    }

    pub fn latest_bmi(&self, user_id: &str) -> TrackerResult<Option<BmiRecord>> {
        Ok(self.db.latest_bmi_record(user_id)?)
    }

    pub fn get_bmi(&self, user_id: &str, id: i64) -> TrackerResult<BmiRecord> {
        self.db
            .bmi_record(id, Some(user_id))?
            .ok_or(TrackerError::BmiRecordNotFound(id))
    }

    pub fn delete_bmi(&self, user_id: &str, id: i64) -> TrackerResult<()> {
        if !self.db.delete_bmi_record(id, Some(user_id))? {
            return Err(TrackerError::BmiRecordNotFound(id));
        }
        info!(user_id, id, "BMI record deleted");
        Ok(())
    }

    pub fn admin_all_bmi(&self) -> TrackerResult<Vec<BmiRecord>> {
        Ok(self.db.all_bmi_records()?)
    }

    pub fn admin_bmi_for(&self, user_id: &str) -> TrackerResult<Vec<BmiRecord>> {
        Ok(self.db.bmi_records_for_user(user_id)?)
    }

    pub fn admin_delete_bmi(&self, id: i64) -> TrackerResult<()> {
        if !self.db.delete_bmi_record(id, None)? {
            return Err(TrackerError::BmiRecordNotFound(id));
        }
        info!(id, "BMI record deleted by admin");
        Ok(())
    }

    pub fn admin_bmi_stats(&self) -> TrackerResult<BmiStats> {
        Ok(self.db.bmi_stats(Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn tracker() -> Tracker {
        Tracker::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_calculate_does_not_persist() {
        let t = tracker();
        let calc = calculate(70.0, 1.75, 25, Gender::Male).unwrap();
        assert_eq!(calc.result.bmi_value, 22.86);
        assert_eq!(calc.result.category, "Normal");
        assert_eq!(calc.input.age_years, 25);
        assert!(t.list_bmi("u1").unwrap().is_empty());
    }

    #[test]
    fn test_calculate_rejects_bad_input() {
        assert!(matches!(
            calculate(70.0, 0.3, 25, Gender::Male),
            Err(ValidationError::HeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_record_bmi_stores_classification() {
        let t = tracker();
        let recorded = t.record_bmi("u1", 90.0, 1.8, 40, Gender::Male).unwrap();
        assert_eq!(recorded.record.bmi_value, 27.78);
        assert_eq!(recorded.record.category, "Overweight");
        assert_eq!(recorded.record.status, BmiStatus::Caution);
        assert_eq!(recorded.record.notes.as_deref(), Some(recorded.recommendation));

        let latest = t.latest_bmi("u1").unwrap().unwrap();
        assert_eq!(latest, recorded.record);
    }

    #[test]
    fn test_record_bmi_invalid_age_is_stored() {
        let t = tracker();
        let recorded = t.record_bmi("u1", 10.0, 0.8, 1, Gender::Female).unwrap();
        assert_eq!(recorded.record.category, "Invalid Age");
        assert_eq!(recorded.record.status, BmiStatus::NotOk);
    }

    #[test]
    fn test_record_bmi_validation_error_stores_nothing() {
        let t = tracker();
        let err = t.record_bmi("u1", 600.0, 1.8, 40, Gender::Male).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::WeightOutOfRange { .. })));
        assert!(t.list_bmi("u1").unwrap().is_empty());
    }

    #[test]
    fn test_get_and_delete_are_owner_scoped() {
        let t = tracker();
        let id = t.record_bmi("u1", 70.0, 1.75, 25, Gender::Male).unwrap().record.id;

        assert!(matches!(t.get_bmi("u2", id), Err(TrackerError::BmiRecordNotFound(_))));
        assert!(matches!(t.delete_bmi("u2", id), Err(TrackerError::BmiRecordNotFound(_))));
        assert_eq!(t.get_bmi("u1", id).unwrap().id, id);

        t.delete_bmi("u1", id).unwrap();
        assert!(matches!(t.delete_bmi("u1", id), Err(TrackerError::BmiRecordNotFound(_))));
    }

    #[test]
    fn test_admin_operations() {
        let t = tracker();
        t.record_bmi("u1", 70.0, 1.75, 25, Gender::Male).unwrap();
        let id = t.record_bmi("u2", 50.0, 1.75, 70, Gender::Female).unwrap().record.id;

        assert_eq!(t.admin_all_bmi().unwrap().len(), 2);
        assert_eq!(t.admin_bmi_for("u2").unwrap().len(), 1);

        let stats = t.admin_bmi_stats().unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.recent_records, 2);
        assert_eq!(stats.category_distribution.get("Underweight"), Some(&1));

        t.admin_delete_bmi(id).unwrap();
        assert!(matches!(t.admin_delete_bmi(id), Err(TrackerError::BmiRecordNotFound(_))));
        assert_eq!(t.admin_all_bmi().unwrap().len(), 1);
    }
}
