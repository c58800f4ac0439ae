//! Personal-record evaluator
//!
//! Heavier weight always wins; equal weight wins only with more reps.
//! A lighter set never beats the record, whatever the rep count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly logged set considered for the record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCandidate {
    pub exercise_id: String,
    pub weight_kg: f64,
    pub reps: u32,
}

/// Current best for one (user, exercise) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrRecord {
    pub user_id: String,
    pub exercise_id: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrDecision {
    /// Replace the stored best with this record
    NewRecord(PrRecord),
    /// Leave the stored best untouched
    Unchanged,
}

impl PrDecision {
    pub fn is_new_record(&self) -> bool {
        matches!(self, PrDecision::NewRecord(_))
    }

    pub fn record_to_persist(&self) -> Option<&PrRecord> {
        match self {
            PrDecision::NewRecord(record) => Some(record),
            PrDecision::Unchanged => None,
        }
    }
}

/// Two-key ordering: weight first, reps as tiebreaker
pub fn supersedes(weight_kg: f64, reps: u32, best_weight_kg: f64, best_reps: u32) -> bool {
    weight_kg > best_weight_kg || (weight_kg == best_weight_kg && reps > best_reps)
}

/// Decide whether `candidate` replaces `current_best`.
///
/// `current_best` is `None` for the first set a user logs for an exercise.
/// The caller must read `current_best` and persist the outcome as one unit.
pub fn evaluate(
    user_id: &str,
    candidate: &PrCandidate,
    current_best: Option<&PrRecord>,
    now: DateTime<Utc>,
) -> PrDecision {
    let is_new = match current_best {
        None => true,
        Some(best) => supersedes(candidate.weight_kg, candidate.reps, best.weight_kg, best.reps),
    };

    if !is_new {
        return PrDecision::Unchanged;
    }

    PrDecision::NewRecord(PrRecord {
        user_id: user_id.to_string(),
        exercise_id: candidate.exercise_id.clone(),
        weight_kg: candidate.weight_kg,
        reps: candidate.reps,
        recorded_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(weight_kg: f64, reps: u32) -> PrCandidate {
        PrCandidate {
            exercise_id: "bench_press".to_string(),
            weight_kg,
            reps,
        }
    }

    fn best(weight_kg: f64, reps: u32) -> PrRecord {
        PrRecord {
            user_id: "u1".to_string(),
            exercise_id: "bench_press".to_string(),
            weight_kg,
            reps,
            recorded_at: Utc::now() - Duration::days(3),
        }
    }

    #[test]
    fn test_first_set_is_record() {
        let now = Utc::now();
        let decision = evaluate("u1", &candidate(100.0, 5), None, now);
        assert!(decision.is_new_record());
        let record = decision.record_to_persist().unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.exercise_id, "bench_press");
        assert_eq!(record.weight_kg, 100.0);
        assert_eq!(record.reps, 5);
        assert_eq!(record.recorded_at, now);
    }

    #[test]
    fn test_identical_set_is_not_record() {
        let decision = evaluate("u1", &candidate(100.0, 5), Some(&best(100.0, 5)), Utc::now());
        assert!(!decision.is_new_record());
        assert!(decision.record_to_persist().is_none());
    }

    #[test]
    fn test_heavier_weight_wins_regardless_of_reps() {
        let decision = evaluate("u1", &candidate(110.0, 3), Some(&best(100.0, 10)), Utc::now());
        assert!(decision.is_new_record());
    }

    #[test]
    fn test_lighter_weight_never_wins() {
        let decision = evaluate("u1", &candidate(90.0, 12), Some(&best(100.0, 5)), Utc::now());
        assert_eq!(decision, PrDecision::Unchanged);
    }

    #[test]
    fn test_same_weight_more_reps_wins() {
        assert!(evaluate("u1", &candidate(100.0, 6), Some(&best(100.0, 5)), Utc::now()).is_new_record());
        assert!(!evaluate("u1", &candidate(100.0, 4), Some(&best(100.0, 5)), Utc::now()).is_new_record());
    }

    #[test]
    fn test_new_record_gets_new_timestamp() {
        let prior = best(100.0, 5);
        let now = Utc::now();
        let decision = evaluate("u1", &candidate(102.5, 1), Some(&prior), now);
        let record = decision.record_to_persist().unwrap();
        assert_eq!(record.recorded_at, now);
        assert!(record.recorded_at > prior.recorded_at);
    }

    #[test]
    fn test_bodyweight_sets() {
        // zero load compares on reps alone
        assert!(supersedes(0.0, 15, 0.0, 12));
        assert!(!supersedes(0.0, 12, 0.0, 12));
    }
}
