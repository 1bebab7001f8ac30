//! Data models for the elevation tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{EngineError, EngineResult};

/// Kind of activity a workout was; display hint only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Bike,
    Run,
    Walk,
    Hike,
    Other,
}

impl WorkoutType {
    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutType::Bike => "🚴",
            WorkoutType::Run => "🏃",
            WorkoutType::Walk => "🚶",
            WorkoutType::Hike => "🥾",
            WorkoutType::Other => "💪",
        }
    }
}

impl std::str::FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bike" | "ride" | "cycle" => Ok(WorkoutType::Bike),
            "run" => Ok(WorkoutType::Run),
            "walk" => Ok(WorkoutType::Walk),
            "hike" => Ok(WorkoutType::Hike),
            "other" => Ok(WorkoutType::Other),
            _ => Err(format!("Unknown workout type: {}", s)),
        }
    }
}

/// Which metric a single-valued workout entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Output energy in kilojoules
    Energy,
    /// Distance in miles
    Distance,
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "energy" | "kj" | "output" => Ok(MetricKind::Energy),
            "distance" | "miles" | "mi" => Ok(MetricKind::Distance),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

/// Metrics recorded for a workout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutMetrics {
    Energy { energy_kj: f64 },
    Distance { distance_miles: f64 },
    Both { energy_kj: f64, distance_miles: f64 },
}

impl WorkoutMetrics {
    /// Build metrics from optional inputs, keeping only positive finite values.
    ///
    /// Fails when neither value is usable.
    pub fn from_options(energy_kj: Option<f64>, distance_miles: Option<f64>) -> EngineResult<Self> {
        let usable = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);
        match (usable(energy_kj), usable(distance_miles)) {
            (Some(energy_kj), Some(distance_miles)) => Ok(WorkoutMetrics::Both {
                energy_kj,
                distance_miles,
            }),
            (Some(energy_kj), None) => Ok(WorkoutMetrics::Energy { energy_kj }),
            (None, Some(distance_miles)) => Ok(WorkoutMetrics::Distance { distance_miles }),
            (None, None) => Err(EngineError::invalid(
                "a workout needs a positive energy or distance value",
            )),
        }
    }

    /// Single-metric value of the given kind
    pub fn single(kind: MetricKind, value: f64) -> EngineResult<Self> {
        match kind {
            MetricKind::Energy => Self::from_options(Some(value), None),
            MetricKind::Distance => Self::from_options(None, Some(value)),
        }
    }

    pub fn energy_kj(&self) -> Option<f64> {
        match *self {
            WorkoutMetrics::Energy { energy_kj } | WorkoutMetrics::Both { energy_kj, .. } => {
                Some(energy_kj)
            }
            WorkoutMetrics::Distance { .. } => None,
        }
    }

    pub fn distance_miles(&self) -> Option<f64> {
        match *self {
            WorkoutMetrics::Distance { distance_miles }
            | WorkoutMetrics::Both { distance_miles, .. } => Some(distance_miles),
            WorkoutMetrics::Energy { .. } => None,
        }
    }
}

/// One logged exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub workout_type: WorkoutType,
    pub date: NaiveDate,
    pub title: String,
    pub metrics: WorkoutMetrics,
}

impl WorkoutRecord {
    pub fn energy_kj(&self) -> Option<f64> {
        self.metrics.energy_kj()
    }

    pub fn distance_miles(&self) -> Option<f64> {
        self.metrics.distance_miles()
    }
}

/// Challenge goal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Target is a height in meters
    Climbing,
    /// Target is a distance in kilometers
    Distance,
}

impl ChallengeKind {
    /// Canonical unit label of this kind's values
    pub fn unit(&self) -> &'static str {
        match self {
            ChallengeKind::Climbing => "m",
            ChallengeKind::Distance => "km",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeKind::Climbing => write!(f, "climbing"),
            ChallengeKind::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for ChallengeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "climbing" | "climb" => Ok(ChallengeKind::Climbing),
            "distance" => Ok(ChallengeKind::Distance),
            _ => Err(format!("Unknown challenge kind: {}", s)),
        }
    }
}

/// Reusable goal definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub id: String,
    pub title: String,
    pub kind: ChallengeKind,
    /// Meters for climbing, kilometers for distance
    pub target_value: f64,
    #[serde(default)]
    pub custom: bool,
}

/// Challenge instance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    #[default]
    Active,
    Completed,
}

/// A user's pursuit of a challenge template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInstance {
    pub instance_id: String,
    /// Template this instance was started from; lookup only
    pub template_id: String,
    pub title: String,
    pub kind: ChallengeKind,
    pub target_value: f64,
    pub progress: f64,
    #[serde(default)]
    pub status: ChallengeStatus,
    pub date_started: NaiveDate,
}

impl ChallengeInstance {
    /// Start a fresh instance of `template`
    pub fn start(template: &ChallengeTemplate, date_started: NaiveDate) -> Self {
        Self {
            instance_id: format!("my_{}_{}", template.id, uuid::Uuid::new_v4()),
            template_id: template.id.clone(),
            title: template.title.clone(),
            kind: template.kind,
            target_value: template.target_value,
            progress: 0.0,
            status: ChallengeStatus::Active,
            date_started,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.target_value
    }

    /// Progress as a percentage of the target, capped at 100
    pub fn percent_complete(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 100.0;
        }
        (self.progress / self.target_value * 100.0).min(100.0)
    }

    pub fn remaining(&self) -> f64 {
        (self.target_value - self.progress).max(0.0)
    }
}

/// Achievement unlocked at a cumulative climbing threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub threshold_meters: f64,
    pub display_name: &'static str,
}
