//! Request and response types exchanged with callers of the engine

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    Badge, ChallengeInstance, ChallengeKind, MetricKind, WorkoutRecord, WorkoutType,
};
use crate::physics::ElevationResult;
use crate::units::{DistanceUnit, HeightUnit, UnitPreferences};

// ============================================================================
// Workouts
// ============================================================================

/// Log a new workout; at least one of the two metrics must be given
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWorkoutRequest {
    #[serde(rename = "type", default)]
    pub workout_type: WorkoutType,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub title: String,
    #[validate(range(min = 0.0, max = 100000.0, message = "must be between 0 and 100000 kJ"))]
    pub energy_kj: Option<f64>,
    #[validate(range(min = 0.0, max = 10000.0, message = "must be between 0 and 10000 miles"))]
    pub distance_miles: Option<f64>,
}

/// Edit a workout; the metrics are replaced by a single value of `metric`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditWorkoutRequest {
    pub id: i64,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub title: String,
    pub metric: MetricKind,
    pub value: f64,
}

// ============================================================================
// Challenges
// ============================================================================

/// Create a custom challenge template
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub title: String,
    pub kind: ChallengeKind,
    /// In `height_unit` for climbing, `distance_unit` for distance
    pub target: f64,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
}

/// Add the selected workouts to one challenge instance
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddProgressRequest {
    #[validate(length(min = 1, message = "select a challenge"))]
    pub instance_id: String,
    #[validate(length(min = 1, message = "select at least one workout"))]
    pub workout_ids: Vec<i64>,
}

/// Outcome of adding progress to a challenge instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    /// Instance after the contribution was applied
    pub instance: ChallengeInstance,
    /// Amount added, in meters or km by challenge kind
    pub contribution: f64,
    /// The instance crossed its target with this update
    pub completed_now: bool,
    pub newly_unlocked: Vec<&'static Badge>,
}

// ============================================================================
// Achievements
// ============================================================================

/// Calculator output: one conversion plus the badges it unlocked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub elevation: ElevationResult,
    pub newly_unlocked: Vec<&'static Badge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeStatus {
    pub badge: &'static Badge,
    pub unlocked: bool,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything the engine needs from the caller's persisted state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,
    #[serde(default)]
    pub instances: Vec<ChallengeInstance>,
    /// Body mass in kg
    pub default_mass_kg: f64,
    #[serde(default)]
    pub units: UnitPreferences,
    #[serde(default)]
    pub unlocked_badges: BTreeSet<String>,
}

impl Snapshot {
    /// Workouts whose id is in `ids`, in history order
    pub fn selected_workouts(&self, ids: &[i64]) -> Vec<WorkoutRecord> {
        self.workouts
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect()
    }

    pub fn find_instance(&self, instance_id: &str) -> Option<&ChallengeInstance> {
        self.instances.iter().find(|c| c.instance_id == instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutMetrics;

    fn log_request(title: &str, energy_kj: Option<f64>) -> LogWorkoutRequest {
        LogWorkoutRequest {
            workout_type: WorkoutType::Bike,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            title: title.to_string(),
            energy_kj,
            distance_miles: None,
        }
    }

    #[test]
    fn test_log_request_validation() {
        assert!(log_request("Evening spin", Some(350.0)).validate().is_ok());
        assert!(log_request("", Some(350.0)).validate().is_err());
        assert!(log_request("Too much", Some(250000.0)).validate().is_err());
    }

    #[test]
    fn test_add_progress_requires_selection() {
        let request = AddProgressRequest {
            instance_id: "my_everest_1".to_string(),
            workout_ids: vec![],
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("workout_ids"));
    }

    #[test]
    fn test_snapshot_defaults_from_json() {
        let snapshot: Snapshot = serde_json::from_str(r#"{ "default_mass_kg": 72.0 }"#).unwrap();
        assert!(snapshot.workouts.is_empty());
        assert_eq!(snapshot.units, UnitPreferences::metric());
        assert!(snapshot.unlocked_badges.is_empty());
    }

    #[test]
    fn test_selected_workouts_keeps_history_order() {
        let workout = |id: i64| WorkoutRecord {
            id,
            workout_type: WorkoutType::Bike,
            date: NaiveDate::from_ymd_opt(2024, 6, id as u32).unwrap(),
            title: format!("Ride {}", id),
            metrics: WorkoutMetrics::Energy { energy_kj: 100.0 },
        };
        let snapshot = Snapshot {
            workouts: vec![workout(3), workout(2), workout(1)],
            default_mass_kg: 80.0,
            ..Default::default()
        };
        let ids: Vec<i64> = snapshot.selected_workouts(&[1, 3]).iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
