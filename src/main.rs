//! gymdesk - Gym tracker with BMI health records, workout sessions and
//! personal records

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use gymdesk::config::{self, Config, DEFAULT_DB_PATH, DEFAULT_USER};
use gymdesk::db::{Difficulty, NewMeasurement, NewPlanExercise, NewWorkoutPlan, PlanUpdate};
use gymdesk::exercises::{exercises_in, get_all_exercises, Category, Exercise};
use gymdesk::report;
use gymdesk::rules::Gender;
use gymdesk::tracker::{self, Tracker};
use gymdesk::tui::App;

#[derive(Parser)]
#[command(name = "gymdesk")]
#[command(author, version, about = "Gym tracker: BMI health records, body measurements, workout plans, sessions and personal records")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "GYMDESK_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Acting user id
    #[arg(short, long, global = true, env = "GYMDESK_USER", default_value = DEFAULT_USER)]
    user: String,

    /// Print JSON envelopes instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// BMI calculation and health records
    Bmi {
        #[command(subcommand)]
        action: BmiCommand,
    },

    /// Body measurements
    Measure {
        #[command(subcommand)]
        action: MeasureCommand,
    },

    /// Workout plan library
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },

    /// Workout sessions and set logging
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Show personal records
    Prs {
        /// Only this exercise id
        exercise: Option<String>,
    },

    /// List the exercise catalog
    Exercises {
        /// Only push, pull, legs or core
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Cross-user BMI administration
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Args)]
struct Measurement {
    /// Weight in kg (1-500)
    #[arg(short, long)]
    weight: f64,

    /// Height in metres (0.5-3.0)
    #[arg(long)]
    height: f64,

    /// Age in years (1-150)
    #[arg(short, long)]
    age: u32,

    /// MALE or FEMALE
    #[arg(short, long)]
    gender: Gender,
}

#[derive(Subcommand)]
enum BmiCommand {
    /// Calculate without saving
    Calc(Measurement),
    /// Calculate and save a health record
    Add(Measurement),
    /// List your records, newest first
    List,
    /// Show your latest record
    Latest,
    /// Show one of your records
    Show { id: i64 },
    /// Delete one of your records
    Delete { id: i64 },
}

#[derive(Args)]
struct MeasurementArgs {
    /// Body weight in kg
    #[arg(short, long)]
    weight: Option<f64>,

    /// Body fat in percent
    #[arg(short = 'f', long)]
    body_fat: Option<f64>,

    /// Waist in cm
    #[arg(long)]
    waist: Option<f64>,

    /// Chest in cm
    #[arg(long)]
    chest: Option<f64>,

    /// Arms in cm
    #[arg(long)]
    arms: Option<f64>,

    /// Legs in cm
    #[arg(long)]
    legs: Option<f64>,
}

impl From<MeasurementArgs> for NewMeasurement {
    fn from(args: MeasurementArgs) -> Self {
        Self {
            weight: args.weight,
            body_fat: args.body_fat,
            waist: args.waist,
            chest: args.chest,
            arms: args.arms,
            legs: args.legs,
        }
    }
}

#[derive(Subcommand)]
enum MeasureCommand {
    /// Record a measurement (any subset of values)
    Add(MeasurementArgs),
    /// List your measurements, newest first
    List,
}

#[derive(Args)]
struct PlanFields {
    #[arg(short, long)]
    description: Option<String>,

    /// Training goal, e.g. "Weight Loss"
    #[arg(short, long)]
    goal: Option<String>,

    /// Duration in weeks
    #[arg(short, long)]
    weeks: Option<u32>,

    /// BEGINNER, INTERMEDIATE or ADVANCED
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Exercise as exercise_id[:sets[:reps]], repeat in order
    #[arg(short, long = "exercise")]
    exercises: Vec<NewPlanExercise>,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Create a plan
    Create {
        title: String,

        #[command(flatten)]
        fields: PlanFields,

        /// Store the plan archived
        #[arg(long)]
        inactive: bool,
    },
    /// List active plans
    List,
    /// Show one plan
    Show { id: i64 },
    /// Update a plan; given exercises replace the existing ones
    Update {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: PlanFields,

        /// Archive (false) or reactivate (true)
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a plan
    Delete { id: i64 },
    /// Active plans matching your latest BMI
    Recommended,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Start a session (cancels any unfinished one)
    Start {
        /// Workout plan id
        #[arg(short, long)]
        plan: Option<i64>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Log a set
    Log {
        /// Exercise id (see `gymdesk exercises`)
        exercise: String,

        /// Set number within the session
        #[arg(short, long, default_value = "1")]
        set: u32,

        /// Load in kg (0 for bodyweight)
        #[arg(short, long, default_value = "0")]
        weight: f64,

        #[arg(short, long)]
        reps: u32,

        /// Session id (defaults to the active session)
        #[arg(long)]
        session: Option<i64>,
    },

    /// Complete a session
    Complete {
        /// Session id (defaults to the active session)
        #[arg(long)]
        session: Option<i64>,

        #[arg(short, long)]
        notes: Option<String>,

        /// Total volume in kg (computed from sets when omitted)
        #[arg(short, long)]
        volume: Option<f64>,
    },

    /// Show the active session
    Active,

    /// Session history, newest first
    History {
        /// Number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List BMI records of all users, or of one user
    BmiList {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Aggregate BMI statistics
    BmiStats,
    /// Delete any BMI record
    BmiDelete { id: i64 },
}

fn print_one<T: Serialize>(config: &Config, message: &str, data: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if config.json {
        println!("{}", report::envelope(message, data)?);
    } else {
        println!("{}", text(data));
    }
    Ok(())
}

fn print_list<T: Serialize>(config: &Config, message: &str, data: &[T], text: impl FnOnce(&[T]) -> String) -> Result<()> {
    if config.json {
        println!("{}", report::envelope_list(message, data)?);
    } else {
        println!("{}", text(data));
    }
    Ok(())
}

fn print_done(config: &Config, message: &str) -> Result<()> {
    print_one(config, message, &(), |_| message.to_string())
}

fn run_bmi(tracker: &Tracker, config: &Config, action: BmiCommand) -> Result<()> {
    let user = config.user_id.as_str();
    match action {
        BmiCommand::Calc(m) => {
            let calc = tracker::calculate(m.weight, m.height, m.age, m.gender)?;
            print_one(config, "BMI calculated successfully", &calc, report::bmi_calculation)
        }
        BmiCommand::Add(m) => {
            let recorded = tracker.record_bmi(user, m.weight, m.height, m.age, m.gender)?;
            print_one(config, "BMI record created successfully", &recorded, report::recorded_bmi)
        }
        BmiCommand::List => {
            let records = tracker.list_bmi(user)?;
            print_list(config, "BMI records retrieved successfully", &records, report::bmi_table)
        }
        BmiCommand::Latest => match tracker.latest_bmi(user)? {
            Some(record) => print_one(config, "Latest BMI record retrieved successfully", &record, report::bmi_record),
            None => print_one(config, "No BMI records found", &None::<()>, |_| "No BMI records found".to_string()),
        },
        BmiCommand::Show { id } => {
            let record = tracker.get_bmi(user, id)?;
            print_one(config, "BMI record retrieved successfully", &record, report::bmi_record)
        }
        BmiCommand::Delete { id } => {
            tracker.delete_bmi(user, id)?;
            print_done(config, "BMI record deleted successfully")
        }
    }
}

fn run_session(tracker: &mut Tracker, config: &Config, action: SessionCommand) -> Result<()> {
    let user = config.user_id.as_str();
    match action {
        SessionCommand::Start { plan, notes } => {
            let session = tracker.start_session(user, plan, notes.as_deref())?;
            print_one(config, "Session started", &session, report::session)
        }
        SessionCommand::Log { exercise, set, weight, reps, session } => {
            let logged = match session {
                Some(id) => tracker.log_set(user, id, &exercise, set, weight, reps)?,
                None => tracker.log_set_active(user, &exercise, set, weight, reps)?,
            };
            print_one(config, "Set logged", &logged, report::logged_set)
        }
        SessionCommand::Complete { session, notes, volume } => {
            let done = match session {
                Some(id) => tracker.complete_session(user, id, notes.as_deref(), volume)?,
                None => tracker.complete_active(user, notes.as_deref(), volume)?,
            };
            print_one(config, "Session completed", &done, report::session)
        }
        SessionCommand::Active => match tracker.active_session(user)? {
            Some(session) => print_one(config, "Active session", &session, report::session),
            None => print_one(config, "No active session", &None::<()>, |_| "No active session".to_string()),
        },
        SessionCommand::History { limit } => {
            let mut sessions = tracker.session_history(user)?;
            sessions.truncate(limit);
            print_list(config, "Session history", &sessions, report::session_list)
        }
    }
}

fn run_measure(tracker: &Tracker, config: &Config, action: MeasureCommand) -> Result<()> {
    let user = config.user_id.as_str();
    match action {
        MeasureCommand::Add(args) => {
            let stored = tracker.add_measurement(user, &args.into())?;
            print_one(config, "Measurement recorded", &stored, report::measurement)
        }
        MeasureCommand::List => {
            let measurements = tracker.measurements(user)?;
            print_list(config, "Measurements retrieved successfully", &measurements, report::measurement_table)
        }
    }
}

fn run_plan(tracker: &mut Tracker, config: &Config, action: PlanCommand) -> Result<()> {
    match action {
        PlanCommand::Create { title, fields, inactive } => {
            let plan = tracker.create_plan(NewWorkoutPlan {
                title,
                description: fields.description,
                goal: fields.goal,
                duration_weeks: fields.weeks,
                difficulty: fields.difficulty,
                is_active: !inactive,
                exercises: fields.exercises,
            })?;
            print_one(config, "Workout plan created", &plan, report::plan)
        }
        PlanCommand::List => {
            let plans = tracker.plans()?;
            print_list(config, "Workout plans retrieved successfully", &plans, report::plan_list)
        }
        PlanCommand::Show { id } => {
            let plan = tracker.plan(id)?;
            print_one(config, "Workout plan retrieved successfully", &plan, report::plan)
        }
        PlanCommand::Update { id, title, fields, active } => {
            let exercises = (!fields.exercises.is_empty()).then_some(fields.exercises);
            let plan = tracker.update_plan(id, PlanUpdate {
                title,
                description: fields.description,
                goal: fields.goal,
                duration_weeks: fields.weeks,
                difficulty: fields.difficulty,
                is_active: active,
                exercises,
            })?;
            print_one(config, "Workout plan updated", &plan, report::plan)
        }
        PlanCommand::Delete { id } => {
            tracker.delete_plan(id)?;
            print_done(config, "Workout plan deleted")
        }
        PlanCommand::Recommended => {
            let plans = tracker.recommended_plans(&config.user_id)?;
            print_list(config, "Recommended workout plans", &plans, report::plan_list)
        }
    }
}

fn run_admin(tracker: &Tracker, config: &Config, action: AdminCommand) -> Result<()> {
    match action {
        AdminCommand::BmiList { owner } => {
            let records = match owner {
                Some(owner) => tracker.admin_bmi_for(&owner)?,
                None => tracker.admin_all_bmi()?,
            };
            print_list(config, "BMI records retrieved successfully", &records, report::bmi_table)
        }
        AdminCommand::BmiStats => {
            let stats = tracker.admin_bmi_stats()?;
            print_one(config, "BMI statistics", &stats, report::bmi_stats)
        }
        AdminCommand::BmiDelete { id } => {
            tracker.admin_delete_bmi(id)?;
            print_done(config, "BMI record deleted successfully")
        }
    }
}

fn run(command: Option<Commands>, config: &Config) -> Result<()> {
    let mut tracker = Tracker::open(config)?;

    match command {
        Some(Commands::Bmi { action }) => run_bmi(&tracker, config, action),
        Some(Commands::Measure { action }) => run_measure(&tracker, config, action),
        Some(Commands::Plan { action }) => run_plan(&mut tracker, config, action),
        Some(Commands::Session { action }) => run_session(&mut tracker, config, action),
        Some(Commands::Admin { action }) => run_admin(&tracker, config, action),
        Some(Commands::Prs { exercise }) => match exercise {
            Some(exercise) => {
                let records: Vec<_> = tracker.personal_record(&config.user_id, &exercise)?.into_iter().collect();
                print_list(config, "Personal record", &records, report::personal_records)
            }
            None => {
                let records = tracker.personal_records(&config.user_id)?;
                print_list(config, "Personal records", &records, report::personal_records)
            }
        },
        Some(Commands::Exercises { category }) => {
            let catalog: Vec<Exercise> = match category {
                Some(category) => exercises_in(category).cloned().collect(),
                None => get_all_exercises().to_vec(),
            };
            print_list(config, "Exercise catalog", &catalog, report::exercises)
        }
        Some(Commands::Tui) | None => {
            let mut app = App::new(tracker, &config.user_id)?;
            app.run()
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    config::init_logging();

    let cli = Cli::parse();
    let config = Config::new(cli.db, &cli.user, cli.json);

    let result = run(cli.command, &config);
    if config.json
        && let Err(e) = &result
    {
        println!("{}", report::error_envelope("Request failed", &e.to_string()));
    }
    result
}
