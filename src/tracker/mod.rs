//! Recording service - validates input, runs the rules, persists results
//!
//! Per-user operations take the acting user explicitly. User-facing reads
//! and deletes are scoped to that user; the `admin_*` operations are not.
//! Workout plans are a shared library visible to every user.

mod bmi;
mod plans;
mod progress;
mod workouts;

pub use bmi::{BmiCalculation, RecordedBmi, calculate};

use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::error::TrackerResult;

pub struct Tracker {
    db: Database,
}

impl Tracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database named in the config
    pub fn open(config: &Config) -> TrackerResult<Self> {
        let db = Database::open(&config.db_path)?;
        info!(db = %config.db_path.display(), "tracker ready");
        Ok(Self::new(db))
    }
}
