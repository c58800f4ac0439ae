//! BMI health records

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension, Result, Row};
use serde::Serialize;

use super::{parse_column, stored_time, timestamp_column, to_timestamp, Database};
use crate::rules::{BmiStatus, Gender};

/// Classified measurement ready to be stored
#[derive(Debug, Clone)]
pub struct NewBmiRecord {
    pub user_id: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub bmi_value: f64,
    pub category: String,
    pub status: BmiStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored BMI measurement
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BmiRecord {
    pub id: i64,
    pub user_id: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub bmi_value: f64,
    pub category: String,
    pub status: BmiStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BmiStats {
    pub total_records: i64,
    pub total_users: i64,
    /// Records created in the last 7 days
    pub recent_records: i64,
    pub status_distribution: BTreeMap<String, i64>,
    pub category_distribution: BTreeMap<String, i64>,
}

const SELECT_BMI: &str = "SELECT id, user_id, age, gender, height, weight, bmi_value, \
                          category, status, notes, created_at FROM bmi_records";

fn bmi_from_row(row: &Row<'_>) -> Result<BmiRecord> {
    Ok(BmiRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        age: row.get(2)?,
        gender: parse_column(row, 3)?,
        height: row.get(4)?,
        weight: row.get(5)?,
        bmi_value: row.get(6)?,
        category: row.get(7)?,
        status: parse_column(row, 8)?,
        notes: row.get(9)?,
        created_at: timestamp_column(row, 10)?,
    })
}

impl Database {
    /// Add new BMI record
    pub fn insert_bmi_record(&self, record: &NewBmiRecord) -> Result<BmiRecord> {
        let created_at = stored_time(record.created_at);
        self.conn.execute(
            "INSERT INTO bmi_records (user_id, age, gender, height, weight, bmi_value, category, status, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.user_id,
                record.age,
                record.gender.as_str(),
                record.height,
                record.weight,
                record.bmi_value,
                record.category,
                record.status.as_str(),
                record.notes,
                to_timestamp(created_at),
            ],
        )?;

        Ok(BmiRecord {
            id: self.conn.last_insert_rowid(),
            user_id: record.user_id.clone(),
            age: record.age,
            gender: record.gender,
            height: record.height,
            weight: record.weight,
            bmi_value: record.bmi_value,
            category: record.category.clone(),
            status: record.status,
            notes: record.notes.clone(),
            created_at,
        })
    }

    /// Records of one user, newest first
    pub fn bmi_records_for_user(&self, user_id: &str) -> Result<Vec<BmiRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_BMI} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let records = stmt
            .query_map([user_id], bmi_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Records of every user, newest first
    pub fn all_bmi_records(&self) -> Result<Vec<BmiRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_BMI} ORDER BY created_at DESC, id DESC"))?;
        let records = stmt
            .query_map([], bmi_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn latest_bmi_record(&self, user_id: &str) -> Result<Option<BmiRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_BMI} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1"),
                [user_id],
                bmi_from_row,
            )
            .optional()
    }

    /// Fetch one record; with `owner` set, only that user's record matches
    pub fn bmi_record(&self, id: i64, owner: Option<&str>) -> Result<Option<BmiRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_BMI} WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)"),
                params![id, owner],
                bmi_from_row,
            )
            .optional()
    }

    /// Returns false when nothing matched
    pub fn delete_bmi_record(&self, id: i64, owner: Option<&str>) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM bmi_records WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
            params![id, owner],
        )?;
        Ok(deleted > 0)
    }

    pub fn bmi_stats(&self, now: DateTime<Utc>) -> Result<BmiStats> {
        let (total_records, total_users) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT user_id) FROM bmi_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let recent_records = self.conn.query_row(
            "SELECT COUNT(*) FROM bmi_records WHERE created_at >= ?1",
            [to_timestamp(now - Duration::days(7))],
            |row| row.get(0),
        )?;

        Ok(BmiStats {
            total_records,
            total_users,
            recent_records,
            status_distribution: self.count_bmi_by("status")?,
            category_distribution: self.count_bmi_by("category")?,
        })
    }

    fn count_bmi_by(&self, column: &'static str) -> Result<BTreeMap<String, i64>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {column}, COUNT(*) FROM bmi_records GROUP BY {column}"
        ))?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(user_id: &str, bmi_value: f64, category: &str, status: BmiStatus) -> NewBmiRecord {
        NewBmiRecord {
            user_id: user_id.to_string(),
            age: 30,
            gender: Gender::Male,
            height: 1.8,
            weight: 75.0,
            bmi_value,
            category: category.to_string(),
            status,
            notes: Some("note".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_fetch() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .insert_bmi_record(&new_record("u1", 23.15, "Normal", BmiStatus::Ok))
            .unwrap();
        let fetched = db.bmi_record(stored.id, Some("u1")).unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.gender, Gender::Male);
        assert_eq!(fetched.status, BmiStatus::Ok);
        assert_eq!(fetched.bmi_value, 23.15);
        assert_eq!(fetched.notes.as_deref(), Some("note"));
    }

    #[test]
    fn test_corrupt_date_is_reported() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .insert_bmi_record(&new_record("u1", 23.15, "Normal", BmiStatus::Ok))
            .unwrap();
        db.conn
            .execute("UPDATE bmi_records SET created_at = 'garbage' WHERE id = ?1", [stored.id])
            .unwrap();
        assert!(matches!(
            db.bmi_record(stored.id, None),
            Err(rusqlite::Error::FromSqlConversionFailure(10, _, _))
        ));
    }

    #[test]
    fn test_owner_scope() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .insert_bmi_record(&new_record("u1", 23.15, "Normal", BmiStatus::Ok))
            .unwrap();
        assert!(db.bmi_record(stored.id, Some("u2")).unwrap().is_none());
        assert!(db.bmi_record(stored.id, None).unwrap().is_some());
        assert!(!db.delete_bmi_record(stored.id, Some("u2")).unwrap());
        assert!(db.delete_bmi_record(stored.id, Some("u1")).unwrap());
        assert!(db.bmi_record(stored.id, None).unwrap().is_none());
    }

    #[test]
    fn test_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let mut older = new_record("u1", 24.0, "Normal", BmiStatus::Ok);
        older.created_at = Utc::now() - Duration::days(2);
        db.insert_bmi_record(&older).unwrap();
        let newer = db
            .insert_bmi_record(&new_record("u1", 26.0, "Overweight", BmiStatus::Caution))
            .unwrap();
        db.insert_bmi_record(&new_record("u2", 21.0, "Normal", BmiStatus::Ok))
            .unwrap();

        let records = db.bmi_records_for_user("u1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, newer.id);
        assert_eq!(db.latest_bmi_record("u1").unwrap().unwrap().id, newer.id);
        assert!(db.latest_bmi_record("nobody").unwrap().is_none());
        assert_eq!(db.all_bmi_records().unwrap().len(), 3);
    }

    #[test]
    fn test_stats() {
        let db = Database::open_in_memory().unwrap();
        let mut old = new_record("u1", 24.0, "Normal", BmiStatus::Ok);
        old.created_at = Utc::now() - Duration::days(30);
        db.insert_bmi_record(&old).unwrap();
        db.insert_bmi_record(&new_record("u1", 27.0, "Overweight", BmiStatus::Caution))
            .unwrap();
        db.insert_bmi_record(&new_record("u2", 22.0, "Normal", BmiStatus::Ok))
            .unwrap();

        let stats = db.bmi_stats(Utc::now()).unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.recent_records, 2);
        assert_eq!(stats.status_distribution.get("OK"), Some(&2));
        assert_eq!(stats.status_distribution.get("CAUTION"), Some(&1));
        assert_eq!(stats.category_distribution.get("Normal"), Some(&2));
    }

    #[test]
    fn test_stats_empty() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.bmi_stats(Utc::now()).unwrap(), BmiStats::default());
    }
}
