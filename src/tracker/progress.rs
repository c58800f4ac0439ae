use chrono::Utc;
use tracing::info;

use super::Tracker;
use crate::db::{BodyMeasurement, NewMeasurement};
use crate::error::TrackerResult;
use crate::validation;

impl Tracker {
    pub fn add_measurement(&self, user_id: &str, measurement: &NewMeasurement) -> TrackerResult<BodyMeasurement> {
        validation::measurement(measurement)?;
        let stored = self.db.insert_measurement(user_id, measurement, Utc::now())?;
        info!(user_id, id = stored.id, weight = stored.weight, body_fat = stored.body_fat, "measurement recorded");
        Ok(stored)
    }

    /// The user's measurements, newest first
    pub fn measurements(&self, user_id: &str) -> TrackerResult<Vec<BodyMeasurement>> {
        Ok(self.db.measurements_for_user(user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::{TrackerError, ValidationError};

    fn tracker() -> Tracker {
        Tracker::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_add_and_list() {
        let t = tracker();
        let added = t
            .add_measurement("u1", &NewMeasurement {
                weight: Some(78.4),
                body_fat: Some(16.5),
                chest: Some(102.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(t.measurements("u1").unwrap(), vec![added]);
        assert!(t.measurements("u2").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_measurement_stores_nothing() {
        let t = tracker();
        assert!(matches!(
            t.add_measurement("u1", &NewMeasurement::default()),
            Err(TrackerError::Validation(ValidationError::EmptyMeasurement))
        ));
        assert!(matches!(
            t.add_measurement("u1", &NewMeasurement {
                legs: Some(0.0),
                ..Default::default()
            }),
            Err(TrackerError::Validation(ValidationError::BadMeasurement { field: "legs", .. }))
        ));
        assert!(t.measurements("u1").unwrap().is_empty());
    }
}
