//! Elevation Tracker
//!
//! Command-line front end for the elevation tracker. Logs workouts, turns
//! their output energy into climbed elevation, and tracks progress toward
//! climbing and distance challenges.
//!
//! ## Architecture
//!
//! - Commands: argument parsing and output formatting (this file)
//! - Services: business logic over the shared engine
//! - Repositories: typed access to the stored JSON blobs
//! - Store: key-value persistence in a single JSON file

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueHint};
use elevation_tracker_app::config::{AppConfig, LoggingConfig};
use elevation_tracker_app::error::AppResult;
use elevation_tracker_app::services::{
    AchievementService, ChallengeService, MaintenanceService, SettingsService, WorkoutService,
};
use elevation_tracker_app::state::AppState;
use elevation_tracker_shared::{
    AddProgressRequest, ChallengeKind, CreateChallengeRequest, DistanceUnit, EditWorkoutRequest,
    HeightUnit, LogWorkoutRequest, MetricKind, WeightUnit, WorkoutType,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn workout output into climbed elevation", long_about = None)]
struct Cli {
    /// Config file; defaults to config/{RUST_ENV}.toml
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Store file, overriding the configured path
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    store: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an energy output into elevation
    Calc {
        /// Output energy in kJ
        kj: f64,
        /// Body weight for this calculation only, in the preferred unit
        #[arg(long)]
        weight: Option<f64>,
        /// Unit of --weight
        #[arg(long)]
        unit: Option<WeightUnit>,
    },
    /// Log a workout
    Log {
        #[arg(long)]
        title: String,
        /// Workout date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long = "type", default_value = "bike")]
        workout_type: WorkoutType,
        /// Output energy in kJ
        #[arg(long)]
        kj: Option<f64>,
        /// Distance in miles
        #[arg(long)]
        miles: Option<f64>,
    },
    /// Replace a workout's details with a single metric
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        date: NaiveDate,
        /// energy or distance
        #[arg(long)]
        metric: MetricKind,
        #[arg(long)]
        value: f64,
    },
    /// Delete workouts by id
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// List logged workouts, newest first
    Workouts,
    /// List built-in and custom challenges
    Challenges,
    /// Create a custom challenge
    CreateChallenge {
        #[arg(long)]
        title: String,
        /// climbing or distance
        #[arg(long)]
        kind: ChallengeKind,
        /// Target height or distance
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "meters")]
        height_unit: HeightUnit,
        #[arg(long, default_value = "km")]
        distance_unit: DistanceUnit,
    },
    /// Delete a custom challenge
    DeleteChallenge { id: String },
    /// Start a challenge
    Join { template_id: String },
    /// Remove one of my challenges
    Leave { instance_id: String },
    /// List my challenges
    Mine,
    /// Add selected workouts to one of my challenges
    Progress {
        instance_id: String,
        #[arg(required = true)]
        workout_ids: Vec<i64>,
    },
    /// Lifetime climbing and distance totals
    Facts,
    /// Badge catalog with unlock state
    Badges,
    /// Show or change the profile
    Settings {
        /// Body weight in the preferred unit
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        weight_unit: Option<WeightUnit>,
        #[arg(long)]
        distance_unit: Option<DistanceUnit>,
    },
    /// Remove every custom challenge
    ResetChallenges,
    /// Migrate data stored by older versions
    Migrate,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(store) = &cli.store {
        config.store.path = store.display().to_string();
    }

    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.path,
        "Starting elevation tracker"
    );

    let mut state = AppState::open(config).context("Failed to open store")?;

    if !matches!(cli.command, Command::Migrate) {
        MaintenanceService::migrate_legacy_data(state.store_mut())?;
    }

    if let Err(e) = run(cli.command, &mut state, cli.json) {
        error!(code = e.code(), error = %e, "Command failed");
        eprintln!("error [{}]: {}", e.code(), e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing to stderr so stdout stays clean for results
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    // JSON logging for production (better for log aggregation)
    let result = if logging.json || AppConfig::is_production() {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

fn run(command: Command, state: &mut AppState, json: bool) -> AppResult<()> {
    let default_mass_kg = state.config().profile.default_mass_kg;

    match command {
        Command::Calc { kj, weight, unit } => {
            let mass_kg = match weight {
                Some(w) => {
                    let profile = SettingsService::profile(state.store(), default_mass_kg)?;
                    unit.unwrap_or(profile.units.weight).to_kg(w)
                }
                None => state.mass_kg()?,
            };
            let result = AchievementService::calculate(state.store_mut(), kj, mass_kg)?;
            emit(json, &result, || {
                let e = &result.elevation;
                println!("{:.0} m ({:.0} ft) climbed", e.meters, e.feet);
                println!("Landmark: {}", e.landmark_label);
                for badge in &result.newly_unlocked {
                    println!("🏅 Badge unlocked: {}", badge.display_name);
                }
            })
        }

        Command::Log { title, date, workout_type, kj, miles } => {
            let request = LogWorkoutRequest {
                workout_type,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                title,
                energy_kj: kj,
                distance_miles: miles,
            };
            let workout = WorkoutService::log_workout(state.store_mut(), request, Utc::now())?;
            emit(json, &workout, || println!("Logged workout {}", workout.id))
        }

        Command::Edit { id, title, date, metric, value } => {
            let request = EditWorkoutRequest { id, date, title, metric, value };
            let workout = WorkoutService::edit_workout(state.store_mut(), request)?;
            emit(json, &workout, || println!("Updated workout {}", workout.id))
        }

        Command::Delete { ids } => {
            let removed = WorkoutService::delete_workouts(state.store_mut(), &ids)?;
            emit(json, &serde_json::json!({ "deleted": removed }), || {
                println!("Deleted {} workout(s)", removed)
            })
        }

        Command::Workouts => {
            let workouts = WorkoutService::list_workouts(state.store())?;
            emit(json, &workouts, || {
                if workouts.is_empty() {
                    println!("No workouts logged yet");
                }
                for w in &workouts {
                    let mut metrics = Vec::new();
                    if let Some(kj) = w.energy_kj() {
                        metrics.push(format!("{} kJ", kj));
                    }
                    if let Some(mi) = w.distance_miles() {
                        metrics.push(format!("{} mi", mi));
                    }
                    println!(
                        "{:>14}  {}  {} {:<24} {}",
                        w.id,
                        w.date,
                        w.workout_type.icon(),
                        w.title,
                        metrics.join(", ")
                    );
                }
            })
        }

        Command::Challenges => {
            let templates = ChallengeService::list_templates(state.store())?;
            emit(json, &templates, || {
                for t in &templates {
                    let marker = if t.custom { " (custom)" } else { "" };
                    println!(
                        "{:<28} {:<24} {} {}{}",
                        t.id,
                        t.title,
                        t.target_value,
                        t.kind.unit(),
                        marker
                    );
                }
            })
        }

        Command::CreateChallenge { title, kind, target, height_unit, distance_unit } => {
            let request = CreateChallengeRequest { title, kind, target, height_unit, distance_unit };
            let template = ChallengeService::create_custom(state.store_mut(), request, Utc::now())?;
            emit(json, &template, || {
                println!(
                    "Created {} ({} {})",
                    template.id,
                    template.target_value,
                    template.kind.unit()
                )
            })
        }

        Command::DeleteChallenge { id } => {
            ChallengeService::delete_custom(state.store_mut(), &id)?;
            emit(json, &serde_json::json!({ "deleted": &id }), || {
                println!("Deleted challenge {}", id)
            })
        }

        Command::Join { template_id } => {
            let today = Local::now().date_naive();
            let instance = ChallengeService::add_to_my_challenges(state.store_mut(), &template_id, today)?;
            emit(json, &instance, || {
                println!("Started {} as {}", instance.title, instance.instance_id)
            })
        }

        Command::Leave { instance_id } => {
            ChallengeService::remove_my_challenge(state.store_mut(), &instance_id)?;
            emit(json, &serde_json::json!({ "removed": &instance_id }), || {
                println!("Removed {}", instance_id)
            })
        }

        Command::Mine => {
            let instances = ChallengeService::list_my_challenges(state.store())?;
            emit(json, &instances, || {
                if instances.is_empty() {
                    println!("No challenges started yet");
                }
                for c in &instances {
                    println!(
                        "{:<40} {:<24} {:.1}/{} {} ({:.0}%) {}",
                        c.instance_id,
                        c.title,
                        c.progress,
                        c.target_value,
                        c.kind.unit(),
                        c.percent_complete(),
                        if c.is_complete() {
                            "✓".to_string()
                        } else {
                            format!("{:.1} {} to go", c.remaining(), c.kind.unit())
                        }
                    );
                }
            })
        }

        Command::Progress { instance_id, workout_ids } => {
            let mass_kg = state.mass_kg()?;
            let request = AddProgressRequest { instance_id, workout_ids };
            let update = ChallengeService::add_progress(state.store_mut(), request, mass_kg)?;
            emit(json, &update, || {
                let c = &update.instance;
                println!("Added {:.2} {} to {}", update.contribution, c.kind.unit(), c.title);
                println!("Progress: {:.1}/{} {}", c.progress, c.target_value, c.kind.unit());
                if update.completed_now {
                    println!("🎉 Challenge complete!");
                }
                for badge in &update.newly_unlocked {
                    println!("🏅 Badge unlocked: {}", badge.display_name);
                }
            })
        }

        Command::Facts => {
            let facts = AchievementService::lifetime_facts(state.store(), state.mass_kg()?)?;
            emit(json, &facts, || {
                let t = &facts.totals;
                println!("Climbed:  {:.0} m ({:.0} ft)", t.climbing_meters, t.climbing_feet);
                println!("          {}", facts.climbing_comparison);
                println!("Distance: {:.1} km ({:.1} mi)", t.distance_km, t.distance_miles);
                println!("          {}", facts.distance_comparison);
            })
        }

        Command::Badges => {
            let badges = AchievementService::badges(state.store())?;
            emit(json, &badges, || {
                for status in &badges {
                    let mark = if status.unlocked { "🏅" } else { "🔒" };
                    println!(
                        "{} {:<14} {} m",
                        mark, status.badge.display_name, status.badge.threshold_meters
                    );
                }
            })
        }

        Command::Settings { weight, weight_unit, distance_unit } => {
            if weight_unit.is_some() || distance_unit.is_some() {
                SettingsService::set_units(state.store_mut(), weight_unit, distance_unit, default_mass_kg)?;
            }
            if let Some(w) = weight {
                SettingsService::set_body_weight(state.store_mut(), w)?;
            }
            let profile = SettingsService::profile(state.store(), default_mass_kg)?;
            emit(json, &profile, || {
                let default_marker = if profile.is_default { " (default)" } else { "" };
                println!(
                    "Body weight: {} {}{}",
                    profile.body_weight, profile.units.weight, default_marker
                );
                println!("Distance unit: {}", profile.units.distance);
            })
        }

        Command::ResetChallenges => {
            let removed = ChallengeService::reset_custom_templates(state.store_mut())?;
            emit(json, &serde_json::json!({ "removed": removed }), || {
                println!("Removed {} custom challenge(s)", removed)
            })
        }

        Command::Migrate => {
            let report = MaintenanceService::migrate_legacy_data(state.store_mut())?;
            emit(json, &report, || {
                if report.is_noop() {
                    println!("Stored data is already current");
                } else {
                    println!("Workouts dropped: {}", report.workouts_dropped);
                    println!("Challenges dropped: {}", report.instances_dropped);
                    println!("Custom challenges imported: {}", report.custom_imported);
                }
            })
        }
    }
}

/// Print `value` as JSON, or run the human-readable printer
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, human: impl FnOnce()) -> AppResult<()> {
    if json {
        let out = serde_json::to_string_pretty(value)
            .map_err(elevation_tracker_app::store::StoreError::from)?;
        println!("{}", out);
    } else {
        human();
    }
    Ok(())
}
