//! gymdesk - Gym tracker with BMI health records, workout sessions and
//! personal records
//!
//! The decision logic lives in [`rules`]; [`tracker`] validates input,
//! applies the rules and persists results through [`db`].

pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod report;
pub mod rules;
pub mod tracker;
pub mod tui;
pub mod validation;

pub use db::Database;
pub use error::{TrackerError, ValidationError};
pub use tracker::Tracker;
