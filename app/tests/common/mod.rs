//! Common test utilities for integration tests
//!
//! Each [`TestApp`] owns a temporary directory holding its store file, so
//! tests never share state.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use elevation_tracker_app::config::AppConfig;
use elevation_tracker_app::services::WorkoutService;
use elevation_tracker_app::state::AppState;
use elevation_tracker_app::store::{save_json, KeyValueStore};
use elevation_tracker_shared::{LogWorkoutRequest, WorkoutRecord, WorkoutType};
use fake::faker::lorem::en::Words;
use fake::Fake;
use serde_json::Value;
use tempfile::TempDir;

/// Test application wrapper
pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
    clock_millis: i64,
}

impl TestApp {
    /// Create a test application over a fresh store file
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = AppState::open(Self::config_for(&dir)).expect("Failed to open store");
        Self {
            state,
            dir,
            clock_millis: 1_717_200_000_000,
        }
    }

    fn config_for(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.store.path = dir.path().join("store.json").display().to_string();
        config
    }

    /// Drop the in-process state and open the same file again
    pub fn reopen(self) -> Self {
        let config = self.state.config().clone();
        let state = AppState::open(config).expect("Failed to reopen store");
        Self { state, ..self }
    }

    pub fn store(&mut self) -> &mut dyn KeyValueStore {
        self.state.store_mut()
    }

    /// Monotonic fake clock so workout ids are predictable
    pub fn tick(&mut self) -> DateTime<Utc> {
        self.clock_millis += 1_000;
        Utc.timestamp_millis_opt(self.clock_millis).unwrap()
    }

    pub fn log(&mut self, energy_kj: Option<f64>, miles: Option<f64>) -> WorkoutRecord {
        let now = self.tick();
        let request = LogWorkoutRequest {
            workout_type: WorkoutType::Bike,
            date: day(1),
            title: random_title(),
            energy_kj,
            distance_miles: miles,
        };
        WorkoutService::log_workout(self.store(), request, now).expect("Failed to log workout")
    }

    /// Write raw JSON under `key`, as an older version would have
    pub fn seed(&mut self, key: &str, value: Value) {
        save_json(self.store(), key, &value).expect("Failed to seed store");
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

pub fn random_title() -> String {
    let words: Vec<String> = Words(2..5).fake();
    words.join(" ")
}
