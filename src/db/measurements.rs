//! Body measurements - tape and scale readings over time

use chrono::{DateTime, Utc};
use rusqlite::{params, Result, Row};
use serde::Serialize;

use super::{stored_time, timestamp_column, to_timestamp, Database};

/// A reading to store; any subset of the fields may be present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMeasurement {
    /// kg
    pub weight: Option<f64>,
    /// percent
    pub body_fat: Option<f64>,
    /// cm
    pub waist: Option<f64>,
    pub chest: Option<f64>,
    pub arms: Option<f64>,
    pub legs: Option<f64>,
}

impl NewMeasurement {
    /// Field names paired with their values, in column order
    pub fn fields(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("weight", self.weight),
            ("body_fat", self.body_fat),
            ("waist", self.waist),
            ("chest", self.chest),
            ("arms", self.arms),
            ("legs", self.legs),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BodyMeasurement {
    pub id: i64,
    pub user_id: String,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub waist: Option<f64>,
    pub chest: Option<f64>,
    pub arms: Option<f64>,
    pub legs: Option<f64>,
    pub created_at: DateTime<Utc>,
}

fn measurement_from_row(row: &Row<'_>) -> Result<BodyMeasurement> {
    Ok(BodyMeasurement {
        id: row.get(0)?,
        user_id: row.get(1)?,
        weight: row.get(2)?,
        body_fat: row.get(3)?,
        waist: row.get(4)?,
        chest: row.get(5)?,
        arms: row.get(6)?,
        legs: row.get(7)?,
        created_at: timestamp_column(row, 8)?,
    })
}

impl Database {
    pub fn insert_measurement(
        &self,
        user_id: &str,
        m: &NewMeasurement,
        now: DateTime<Utc>,
    ) -> Result<BodyMeasurement> {
        let created_at = stored_time(now);
        self.conn.execute(
            "INSERT INTO body_measurements (user_id, weight, body_fat, waist, chest, arms, legs, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                m.weight,
                m.body_fat,
                m.waist,
                m.chest,
                m.arms,
                m.legs,
                to_timestamp(created_at),
            ],
        )?;

        Ok(BodyMeasurement {
            id: self.conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            weight: m.weight,
            body_fat: m.body_fat,
            waist: m.waist,
            chest: m.chest,
            arms: m.arms,
            legs: m.legs,
            created_at,
        })
    }

    /// Measurements of one user, newest first
    pub fn measurements_for_user(&self, user_id: &str) -> Result<Vec<BodyMeasurement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, weight, body_fat, waist, chest, arms, legs, created_at
             FROM body_measurements WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let measurements = stmt
            .query_map([user_id], measurement_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_insert_keeps_missing_fields_empty() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .insert_measurement(
                "u1",
                &NewMeasurement {
                    weight: Some(82.5),
                    waist: Some(86.0),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();

        let all = db.measurements_for_user("u1").unwrap();
        assert_eq!(all, vec![stored]);
        assert_eq!(all[0].weight, Some(82.5));
        assert_eq!(all[0].body_fat, None);
        assert_eq!(all[0].legs, None);
    }

    #[test]
    fn test_newest_first_and_per_user() {
        let db = Database::open_in_memory().unwrap();
        let reading = NewMeasurement {
            weight: Some(80.0),
            ..Default::default()
        };
        let older = db
            .insert_measurement("u1", &reading, Utc::now() - Duration::days(7))
            .unwrap();
        let newer = db.insert_measurement("u1", &reading, Utc::now()).unwrap();
        db.insert_measurement("u2", &reading, Utc::now()).unwrap();

        let ids: Vec<i64> = db.measurements_for_user("u1").unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert!(db.measurements_for_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(NewMeasurement::default().is_empty());
        assert!(!NewMeasurement {
            body_fat: Some(18.0),
            ..Default::default()
        }
        .is_empty());
    }
}
