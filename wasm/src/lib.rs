//! Elevation Tracker WASM Module
//!
//! WebAssembly bindings so the browser host can run the conversion and
//! progress engine directly. Structured values cross the boundary as JSON
//! strings; failures surface as a JS error carrying the message.

use elevation_tracker_shared::migration::{migrate_workout, repair_instances};
use elevation_tracker_shared::{
    achievement_facts, compute_challenge_contribution, compute_lifetime_totals,
    convert_energy_to_elevation, evaluate_badges, find_best_comparison, physics, record_progress,
    ChallengeKind, Snapshot, WeightUnit, WorkoutRecord, CLIMBING_FACTS, DISTANCE_FACTS,
};
use serde::Serialize;
use std::collections::BTreeSet;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn from_json<'a, T: serde::Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {}: {}", what, e))
}

/// Stored history of any generation; undecodable entries are skipped
fn workouts_from_json(json: &str) -> Result<Vec<WorkoutRecord>, String> {
    let raw: Vec<serde_json::Value> = from_json(json, "workouts")?;
    Ok(raw.iter().filter_map(|v| migrate_workout(v).ok()).collect())
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn elevation_json(energy_kj: f64, mass: f64, weight_unit: &str) -> Result<String, String> {
    let unit: WeightUnit = weight_unit.parse()?;
    let result = convert_energy_to_elevation(energy_kj, unit.to_kg(mass)).map_err(|e| e.to_string())?;
    to_json(&result)
}

fn comparison_label(value: f64, table: &str) -> Result<String, String> {
    let facts = match table.parse::<ChallengeKind>()? {
        ChallengeKind::Climbing => CLIMBING_FACTS,
        ChallengeKind::Distance => DISTANCE_FACTS,
    };
    find_best_comparison(value, facts)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

fn contribution_value(workouts_json: &str, kind: &str, mass_kg: f64) -> Result<f64, String> {
    let workouts = workouts_from_json(workouts_json)?;
    let kind: ChallengeKind = kind.parse()?;
    compute_challenge_contribution(&workouts, kind, mass_kg).map_err(|e| e.to_string())
}

fn facts_json(workouts_json: &str, mass_kg: f64) -> Result<String, String> {
    let workouts = workouts_from_json(workouts_json)?;
    let totals = compute_lifetime_totals(&workouts, mass_kg).map_err(|e| e.to_string())?;
    let facts = achievement_facts(totals).map_err(|e| e.to_string())?;
    to_json(&facts)
}

fn progress_json(snapshot_json: &str, instance_id: &str, workout_ids_json: &str) -> Result<String, String> {
    let snapshot: Snapshot = from_json(snapshot_json, "snapshot")?;
    let ids: Vec<i64> = from_json(workout_ids_json, "workout ids")?;
    let update = record_progress(&snapshot, instance_id, &ids).map_err(|e| e.to_string())?;
    to_json(&update)
}

fn badges_json(cumulative_meters: f64, unlocked_json: &str) -> Result<String, String> {
    let unlocked: BTreeSet<String> = from_json(unlocked_json, "badge ids")?;
    to_json(&evaluate_badges(cumulative_meters, &unlocked))
}

fn migrated_json(history_json: &str, instances_json: &str) -> Result<String, String> {
    let history: Vec<serde_json::Value> = from_json(history_json, "workout history")?;
    let instances: Vec<serde_json::Value> = from_json(instances_json, "challenge list")?;

    let workouts: Vec<WorkoutRecord> = history.iter().filter_map(|v| migrate_workout(v).ok()).collect();
    let repaired = repair_instances(&instances);

    to_json(&serde_json::json!({
        "workouts": workouts,
        "instances": repaired.instances,
        "dropped_workouts": history.len() - workouts.len(),
        "dropped_instances": repaired.dropped,
    }))
}

/// Meters climbed for an energy output; NaN on invalid input
#[wasm_bindgen]
pub fn elevation_meters(energy_kj: f64, mass_kg: f64) -> f64 {
    physics::elevation_meters(energy_kj, mass_kg).unwrap_or(f64::NAN)
}

/// Full elevation result as JSON; `weight_unit` is "kg" or "lbs"
#[wasm_bindgen]
pub fn convert_energy(energy_kj: f64, mass: f64, weight_unit: &str) -> Result<String, JsValue> {
    elevation_json(energy_kj, mass, weight_unit).map_err(js_error)
}

/// Landmark phrase for a value; `table` is "climbing" or "distance"
#[wasm_bindgen]
pub fn best_comparison(value: f64, table: &str) -> Result<String, JsValue> {
    comparison_label(value, table).map_err(js_error)
}

#[wasm_bindgen]
pub fn challenge_contribution(workouts_json: &str, kind: &str, mass_kg: f64) -> Result<f64, JsValue> {
    contribution_value(workouts_json, kind, mass_kg).map_err(js_error)
}

/// Lifetime totals and comparisons for the whole history
#[wasm_bindgen]
pub fn lifetime_facts(workouts_json: &str, mass_kg: f64) -> Result<String, JsValue> {
    facts_json(workouts_json, mass_kg).map_err(js_error)
}

/// Apply selected workouts to a challenge instance of the snapshot
#[wasm_bindgen]
pub fn add_progress(snapshot_json: &str, instance_id: &str, workout_ids_json: &str) -> Result<String, JsValue> {
    progress_json(snapshot_json, instance_id, workout_ids_json).map_err(js_error)
}

#[wasm_bindgen]
pub fn newly_unlocked_badges(cumulative_meters: f64, unlocked_json: &str) -> Result<String, JsValue> {
    badges_json(cumulative_meters, unlocked_json).map_err(js_error)
}

/// Normalize stored history and challenge blobs from older revisions
#[wasm_bindgen]
pub fn migrate_stored_data(history_json: &str, instances_json: &str) -> Result<String, JsValue> {
    migrated_json(history_json, instances_json).map_err(js_error)
}
