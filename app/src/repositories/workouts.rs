//! Workout history repository

use elevation_tracker_shared::migration::migrate_workout;
use elevation_tracker_shared::WorkoutRecord;
use serde_json::Value;
use tracing::warn;

use crate::store::{keys, load_json, save_json, KeyValueStore, StoreError};

pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Every decodable workout in stored order; undecodable entries are skipped
    pub fn list(store: &dyn KeyValueStore) -> Result<Vec<WorkoutRecord>, StoreError> {
        let raw: Vec<Value> = load_json(store, keys::WORKOUT_HISTORY, Vec::new())?;
        Ok(raw
            .iter()
            .filter_map(|value| match migrate_workout(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable workout");
                    None
                }
            })
            .collect())
    }

    pub fn save_all(store: &mut dyn KeyValueStore, workouts: &[WorkoutRecord]) -> Result<(), StoreError> {
        save_json(store, keys::WORKOUT_HISTORY, workouts)
    }
}
