//! Challenge catalog: built-in templates and custom template construction

use chrono::{DateTime, Utc};

use crate::errors::{EngineError, EngineResult};
use crate::models::{ChallengeKind, ChallengeTemplate};
use crate::units::{DistanceUnit, HeightUnit};

/// Built-in climbing goals as (id, title, meters)
const CLIMBING_BUILTINS: &[(&str, &str, f64)] = &[
    ("everest", "Mount Everest", 8849.0),
    ("k2", "K2", 8611.0),
    ("kilimanjaro", "Mount Kilimanjaro", 5895.0),
    ("montblanc", "Mont Blanc", 4807.0),
];

/// Built-in distance goals as (id, title, km)
const DISTANCE_BUILTINS: &[(&str, &str, f64)] = &[
    ("marathon", "Marathon", 42.195),
    ("ultra", "Ultra Marathon", 100.0),
    ("century", "Century Ride", 160.9),
    ("cross-country", "Cross Country", 500.0),
    ("tour-de-france", "Tour de France", 3500.0),
];

fn builtin(kind: ChallengeKind, entries: &[(&str, &str, f64)]) -> Vec<ChallengeTemplate> {
    entries
        .iter()
        .map(|(id, title, target_value)| ChallengeTemplate {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            target_value: *target_value,
            custom: false,
        })
        .collect()
}

/// Built-in templates, climbing first
pub fn builtin_templates() -> Vec<ChallengeTemplate> {
    let mut templates = builtin(ChallengeKind::Climbing, CLIMBING_BUILTINS);
    templates.extend(builtin(ChallengeKind::Distance, DISTANCE_BUILTINS));
    templates
}

pub fn is_builtin(id: &str) -> bool {
    CLIMBING_BUILTINS
        .iter()
        .chain(DISTANCE_BUILTINS)
        .any(|(builtin_id, _, _)| *builtin_id == id)
}

/// Built-ins followed by the given custom templates
pub fn all_templates(custom: &[ChallengeTemplate]) -> Vec<ChallengeTemplate> {
    let mut templates = builtin_templates();
    templates.extend(custom.iter().cloned());
    templates
}

pub fn find_template<'a>(templates: &'a [ChallengeTemplate], id: &str) -> Option<&'a ChallengeTemplate> {
    templates.iter().find(|t| t.id == id)
}

fn checked_title(title: &str) -> EngineResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EngineError::invalid("challenge name cannot be empty"));
    }
    Ok(title.to_string())
}

fn checked_target(value: f64, what: &str) -> EngineResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::invalid(format!(
            "{} must be a positive number, got {}",
            what, value
        )));
    }
    Ok(value)
}

/// Custom climbing goal; feet are converted and rounded to whole meters.
pub fn custom_climbing(
    title: &str,
    height: f64,
    unit: HeightUnit,
    now: DateTime<Utc>,
) -> EngineResult<ChallengeTemplate> {
    let title = checked_title(title)?;
    let height = checked_target(height, "height")?;
    let meters = match unit {
        HeightUnit::Meters => height,
        HeightUnit::Feet => unit.to_meters(height).round(),
    };
    // A tiny height in feet can round down to nothing
    let meters = checked_target(meters, "height")?;

    Ok(ChallengeTemplate {
        id: format!("custom_climbing_{}", now.timestamp_millis()),
        title,
        kind: ChallengeKind::Climbing,
        target_value: meters,
        custom: true,
    })
}

/// Custom distance goal; miles are converted to km rounded to 2 decimals.
pub fn custom_distance(
    title: &str,
    distance: f64,
    unit: DistanceUnit,
    now: DateTime<Utc>,
) -> EngineResult<ChallengeTemplate> {
    let title = checked_title(title)?;
    let distance = checked_target(distance, "distance")?;
    let km = match unit {
        DistanceUnit::Km => distance,
        DistanceUnit::Miles => (unit.to_km(distance) * 100.0).round() / 100.0,
    };
    let km = checked_target(km, "distance")?;

    Ok(ChallengeTemplate {
        id: format!("custom_distance_{}", now.timestamp_millis()),
        title,
        kind: ChallengeKind::Distance,
        target_value: km,
        custom: true,
    })
}
