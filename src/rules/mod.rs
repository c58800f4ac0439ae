//! Rules module - pure health and performance decisions
//!
//! - BMI classification by age band and gender
//! - Personal-record detection for logged sets
//!
//! Nothing here touches storage; callers pass in everything a decision needs.

pub mod bmi;
pub mod pr;

pub use bmi::{assess, calculate_bmi, classify, AgeBand, BmiInput, BmiResult, BmiStatus, Gender};
pub use pr::{evaluate, supersedes, PrCandidate, PrDecision, PrRecord};
