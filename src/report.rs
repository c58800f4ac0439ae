//! Output formatting for the CLI - plain text tables or JSON envelopes

use serde::Serialize;

use crate::db::{BmiRecord, BmiStats, BodyMeasurement, LoggedSet, WorkoutPlan, WorkoutSession};
use crate::exercises::{exercise_name, Exercise};
use crate::rules::PrRecord;
use crate::tracker::{BmiCalculation, RecordedBmi};

/// `{success, message, data[, count]}` wrapper for JSON output
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub success: bool,
    pub message: &'a str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

pub fn envelope<T: Serialize>(message: &str, data: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        success: true,
        message,
        data,
        count: None,
    })
}

pub fn envelope_list<T: Serialize>(message: &str, data: &[T]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        success: true,
        message,
        data,
        count: Some(data.len()),
    })
}

pub fn error_envelope(message: &str, error: &str) -> String {
    serde_json::json!({ "success": false, "message": message, "error": error }).to_string()
}

pub fn bmi_calculation(calc: &BmiCalculation) -> String {
    format!(
        "BMI: {:.2} | {} [{}]\n{}",
        calc.result.bmi_value, calc.result.category, calc.result.status, calc.result.recommendation
    )
}

pub fn recorded_bmi(recorded: &RecordedBmi) -> String {
    format!(
        "Recorded #{}: BMI {:.2} | {} [{}]\n{}",
        recorded.record.id,
        recorded.record.bmi_value,
        recorded.record.category,
        recorded.record.status,
        recorded.recommendation
    )
}

pub fn bmi_record(r: &BmiRecord) -> String {
    format!(
        "{:>5} | {} | {:>6.2} | {:20} | {:8} | {}y {} {:.2}m {:.1}kg",
        r.id,
        r.created_at.format("%Y-%m-%d %H:%M"),
        r.bmi_value,
        r.category,
        r.status.as_str(),
        r.age,
        r.gender,
        r.height,
        r.weight
    )
}

pub fn bmi_table(records: &[BmiRecord]) -> String {
    if records.is_empty() {
        return "No BMI records found".to_string();
    }
    let mut out = format!("{:>5} | {:16} | {:>6} | {:20} | {:8} | Input\n", "Id", "Date", "BMI", "Category", "Status");
    out.push_str(&format!("{:-<90}\n", ""));
    for r in records {
        out.push_str(&bmi_record(r));
        out.push('\n');
    }
    out
}

pub fn bmi_stats(stats: &BmiStats) -> String {
    let mut out = String::from("BMI Statistics\n");
    out.push_str(&format!("{:-<40}\n", ""));
    out.push_str(&format!("Total records:   {}\n", stats.total_records));
    out.push_str(&format!("Users:           {}\n", stats.total_users));
    out.push_str(&format!("Last 7 days:     {}\n", stats.recent_records));
    out.push_str("By status:\n");
    for (status, count) in &stats.status_distribution {
        out.push_str(&format!("  {status:20} {count}\n"));
    }
    out.push_str("By category:\n");
    for (category, count) in &stats.category_distribution {
        out.push_str(&format!("  {category:20} {count}\n"));
    }
    out
}

pub fn logged_set(logged: &LoggedSet) -> String {
    let s = &logged.set_log;
    let mut line = format!(
        "Logged: {} set {} - {}kg x {} (id: {})",
        s.exercise_name, s.set_number, s.weight, s.reps, s.id
    );
    match (&logged.new_record, &logged.previous_best) {
        (Some(_), Some(prev)) => {
            line.push_str(&format!("\nNew personal record! (previous: {}kg x {})", prev.weight_kg, prev.reps));
        }
        (Some(_), None) => line.push_str("\nNew personal record! (first set logged)"),
        (None, Some(prev)) => {
            line.push_str(&format!("\nRecord to beat: {}kg x {}", prev.weight_kg, prev.reps));
        }
        (None, None) => {}
    }
    line
}

pub fn session(session: &WorkoutSession) -> String {
    let mut out = format!(
        "Session #{} [{}] started {}",
        session.id,
        session.status,
        session.start_time.format("%Y-%m-%d %H:%M")
    );
    if let Some(end) = session.end_time {
        out.push_str(&format!(", ended {}", end.format("%H:%M")));
    }
    if let Some(plan) = session.workout_plan_id {
        out.push_str(&format!(" | plan: #{plan}"));
    }
    if let Some(volume) = session.total_volume {
        out.push_str(&format!(" | volume: {volume}kg"));
    }
    if let Some(notes) = &session.notes {
        out.push_str(&format!(" | {notes}"));
    }
    for s in &session.set_logs {
        out.push_str(&format!(
            "\n  {:24} #{:<2} {:>7}kg x {:<3}{}",
            s.exercise_name,
            s.set_number,
            s.weight,
            s.reps,
            if s.is_personal_record { " PR" } else { "" }
        ));
    }
    out
}

pub fn session_list(sessions: &[WorkoutSession]) -> String {
    if sessions.is_empty() {
        return "No sessions yet".to_string();
    }
    sessions.iter().map(session).collect::<Vec<_>>().join("\n\n")
}

pub fn personal_records(records: &[PrRecord]) -> String {
    if records.is_empty() {
        return "No personal records yet".to_string();
    }
    let mut out = format!("{:24} | {:>8} | {:>4} | Set on\n", "Exercise", "Weight", "Reps");
    out.push_str(&format!("{:-<60}\n", ""));
    for r in records {
        out.push_str(&format!(
            "{:24} | {:>6}kg | {:>4} | {}\n",
            exercise_name(&r.exercise_id),
            r.weight_kg,
            r.reps,
            r.recorded_at.format("%Y-%m-%d")
        ));
    }
    out
}

pub fn plan(plan: &WorkoutPlan) -> String {
    let mut out = format!("Plan #{} {}", plan.id, plan.title);
    if !plan.is_active {
        out.push_str(" (archived)");
    }
    let details: Vec<String> = [
        plan.goal.clone(),
        plan.difficulty.map(|d| d.to_string()),
        plan.duration_weeks.map(|w| format!("{w} weeks")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        out.push_str(&format!(" | {}", details.join(" | ")));
    }
    if let Some(description) = &plan.description {
        out.push_str(&format!("\n  {description}"));
    }
    for ex in &plan.exercises {
        let sets = ex.sets.map(|s| format!("{s} x ")).unwrap_or_default();
        out.push_str(&format!(
            "\n  {:>2}. {:24} {}{}",
            ex.position,
            ex.exercise_name,
            sets,
            ex.reps.as_deref().unwrap_or("-")
        ));
        if let Some(notes) = &ex.notes {
            out.push_str(&format!("  ({notes})"));
        }
    }
    out
}

pub fn plan_list(plans: &[WorkoutPlan]) -> String {
    if plans.is_empty() {
        return "No workout plans found".to_string();
    }
    plans.iter().map(plan).collect::<Vec<_>>().join("\n\n")
}

fn reading(value: Option<f64>, unit: &str) -> String {
    value.map(|v| format!("{v:.1}{unit}")).unwrap_or_else(|| "-".to_string())
}

pub fn measurement(m: &BodyMeasurement) -> String {
    format!(
        "{:>5} | {} | {:>8} | {:>6} | {:>7} | {:>7} | {:>7} | {:>7}",
        m.id,
        m.created_at.format("%Y-%m-%d %H:%M"),
        reading(m.weight, "kg"),
        reading(m.body_fat, "%"),
        reading(m.waist, "cm"),
        reading(m.chest, "cm"),
        reading(m.arms, "cm"),
        reading(m.legs, "cm")
    )
}

pub fn measurement_table(measurements: &[BodyMeasurement]) -> String {
    if measurements.is_empty() {
        return "No measurements yet".to_string();
    }
    let mut out = format!(
        "{:>5} | {:16} | {:>8} | {:>6} | {:>7} | {:>7} | {:>7} | {:>7}\n",
        "Id", "Date", "Weight", "Fat", "Waist", "Chest", "Arms", "Legs"
    );
    out.push_str(&format!("{:-<90}\n", ""));
    for m in measurements {
        out.push_str(&measurement(m));
        out.push('\n');
    }
    out
}

pub fn exercises(exercises: &[Exercise]) -> String {
    let mut out = String::new();
    for e in exercises {
        let muscles: Vec<&str> = e.muscle_groups.iter().map(|m| m.name()).collect();
        out.push_str(&format!(
            "{:24} {:24} {:5} {:?} ({})\n",
            e.id,
            e.name,
            e.category.name(),
            e.equipment,
            muscles.join(", ")
        ));
    }
    out
}
