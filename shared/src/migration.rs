//! Decoding of records written by older app revisions
//!
//! Stored blobs come in three generations: the current sum-typed shape, a
//! "dual" shape carrying both `outputKj`/`miles` and the single-value
//! `output`/`metricType` pair, and the flat legacy shape with only
//! `output`/`metricType`. Everything is normalized here so the rest of the
//! engine only ever sees [`WorkoutRecord`], [`ChallengeTemplate`] and
//! [`ChallengeInstance`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::is_builtin;
use crate::errors::MigrationError;
use crate::models::{
    ChallengeInstance, ChallengeKind, ChallengeStatus, ChallengeTemplate, WorkoutMetrics,
    WorkoutRecord, WorkoutType,
};

#[derive(Debug, Deserialize)]
struct LegacyWorkout {
    id: Option<i64>,
    #[serde(rename = "type")]
    workout_type: Option<String>,
    date: Option<String>,
    title: Option<String>,
    #[serde(rename = "outputKj", alias = "output_kj")]
    output_kj: Option<f64>,
    miles: Option<f64>,
    output: Option<f64>,
    #[serde(rename = "metricType")]
    metric_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyTemplate {
    id: Option<String>,
    title: Option<String>,
    name: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    target_value: Option<f64>,
    height: Option<f64>,
    distance: Option<f64>,
    custom: Option<bool>,
    #[serde(rename = "isCustom")]
    is_custom: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LegacyInstance {
    #[serde(alias = "instanceId")]
    instance_id: Option<String>,
    #[serde(alias = "originalId")]
    template_id: Option<String>,
    id: Option<String>,
    title: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    target_value: Option<f64>,
    height: Option<f64>,
    distance: Option<f64>,
    progress: Option<f64>,
    status: Option<String>,
    #[serde(alias = "dateStarted")]
    date_started: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Accepts `YYYY-MM-DD` and full ISO timestamps
fn parse_date(raw: &str) -> Result<NaiveDate, MigrationError> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| MigrationError::Malformed(format!("unreadable date '{}'", raw)))
}

fn parse_kind(raw: Option<&str>, has_height: bool, has_distance: bool) -> ChallengeKind {
    match raw.and_then(|k| k.parse::<ChallengeKind>().ok()) {
        Some(kind) => kind,
        None if has_distance && !has_height => ChallengeKind::Distance,
        None => ChallengeKind::Climbing,
    }
}

fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Decode a stored workout of any generation
pub fn migrate_workout(value: &Value) -> Result<WorkoutRecord, MigrationError> {
    if let Ok(record) = serde_json::from_value::<WorkoutRecord>(value.clone()) {
        return check_workout(record);
    }

    let legacy: LegacyWorkout = serde_json::from_value(value.clone())
        .map_err(|e| MigrationError::Malformed(e.to_string()))?;

    let id = legacy
        .id
        .ok_or_else(|| MigrationError::Malformed("workout without id".to_string()))?;
    let title = non_empty(legacy.title)
        .ok_or_else(|| MigrationError::Malformed(format!("workout {} has no title", id)))?;
    let date = legacy
        .date
        .as_deref()
        .ok_or_else(|| MigrationError::Malformed(format!("workout {} has no date", id)))
        .and_then(parse_date)?;
    let workout_type = legacy
        .workout_type
        .as_deref()
        .map(|t| t.parse().unwrap_or(WorkoutType::Other))
        .unwrap_or_default();

    let (energy_kj, miles) = match (positive(legacy.output_kj), positive(legacy.miles)) {
        (None, None) => match legacy.metric_type.as_deref() {
            // metricType decides which metric a single legacy value was
            Some("miles") => (None, positive(legacy.output)),
            _ => (positive(legacy.output), None),
        },
        dual => dual,
    };

    let metrics = WorkoutMetrics::from_options(energy_kj, miles)
        .map_err(|_| MigrationError::NoMetric(format!("workout {}", id)))?;

    Ok(WorkoutRecord {
        id,
        workout_type,
        date,
        title,
        metrics,
    })
}

/// A current-shape record still has to carry a title and a positive metric
fn check_workout(record: WorkoutRecord) -> Result<WorkoutRecord, MigrationError> {
    let id = record.id;
    let title = non_empty(Some(record.title))
        .ok_or_else(|| MigrationError::Malformed(format!("workout {} has no title", id)))?;
    let metrics = WorkoutMetrics::from_options(record.metrics.energy_kj(), record.metrics.distance_miles())
        .map_err(|_| MigrationError::NoMetric(format!("workout {}", id)))?;
    Ok(WorkoutRecord {
        title,
        metrics,
        ..record
    })
}

/// Decode a stored challenge template of any generation
pub fn migrate_template(value: &Value) -> Result<ChallengeTemplate, MigrationError> {
    let legacy: LegacyTemplate = serde_json::from_value(value.clone())
        .map_err(|e| MigrationError::Malformed(e.to_string()))?;

    let title = non_empty(legacy.title)
        .or_else(|| non_empty(legacy.name))
        .ok_or_else(|| MigrationError::Malformed("challenge without a title".to_string()))?;
    let kind = parse_kind(
        legacy.kind.as_deref(),
        legacy.height.is_some(),
        legacy.distance.is_some(),
    );
    let target = match kind {
        ChallengeKind::Climbing => positive(legacy.target_value).or(positive(legacy.height)),
        ChallengeKind::Distance => positive(legacy.target_value).or(positive(legacy.distance)),
    };
    let target_value = target.ok_or_else(|| {
        MigrationError::Malformed(format!("challenge '{}' has no usable target", title))
    })?;

    let id = non_empty(legacy.id).unwrap_or_else(|| format!("custom_{}_{}", kind, slug(&title)));
    let custom = legacy
        .custom
        .or(legacy.is_custom)
        .unwrap_or_else(|| !is_builtin(&id));

    Ok(ChallengeTemplate {
        id,
        title,
        kind,
        target_value,
        custom,
    })
}

/// Decode a stored challenge instance of any generation
pub fn migrate_instance(value: &Value) -> Result<ChallengeInstance, MigrationError> {
    let legacy: LegacyInstance = serde_json::from_value(value.clone())
        .map_err(|e| MigrationError::Malformed(e.to_string()))?;

    let instance_id = non_empty(legacy.instance_id)
        .ok_or_else(|| MigrationError::Malformed("challenge instance without id".to_string()))?;
    let title = non_empty(legacy.title).ok_or_else(|| {
        MigrationError::Malformed(format!("challenge instance {} has no title", instance_id))
    })?;
    let kind = parse_kind(
        legacy.kind.as_deref(),
        legacy.height.is_some(),
        legacy.distance.is_some(),
    );
    let target_value = match kind {
        ChallengeKind::Climbing => positive(legacy.target_value).or(positive(legacy.height)),
        ChallengeKind::Distance => positive(legacy.target_value).or(positive(legacy.distance)),
    }
    .ok_or_else(|| {
        MigrationError::Malformed(format!("challenge instance {} has no target", instance_id))
    })?;
    let date_started = legacy
        .date_started
        .as_deref()
        .ok_or_else(|| {
            MigrationError::Malformed(format!("challenge instance {} has no start date", instance_id))
        })
        .and_then(parse_date)?;

    let progress = legacy
        .progress
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(0.0);
    let template_id = non_empty(legacy.template_id)
        .or_else(|| non_empty(legacy.id))
        .unwrap_or_else(|| instance_id.clone());

    let mut instance = ChallengeInstance {
        instance_id,
        template_id,
        title,
        kind,
        target_value,
        progress,
        status: ChallengeStatus::Active,
        date_started,
    };
    if legacy.status.as_deref() == Some("completed") || instance.is_complete() {
        instance.status = ChallengeStatus::Completed;
    }
    Ok(instance)
}

/// Outcome of repairing the stored challenge instance list
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    pub instances: Vec<ChallengeInstance>,
    pub dropped: usize,
}

/// Keep every decodable instance and count the rest.
pub fn repair_instances(values: &[Value]) -> RepairReport {
    let instances: Vec<ChallengeInstance> = values
        .iter()
        .filter_map(|v| migrate_instance(v).ok())
        .collect();
    RepairReport {
        dropped: values.len() - instances.len(),
        instances,
    }
}

/// Which retired storage key a batch of legacy templates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySource {
    /// `custom_challenges`: every entry is a custom goal
    CustomChallenges,
    /// `challenges`: mixed list, only entries flagged `isCustom` are kept
    Challenges,
}

/// Legacy custom templates not already present in `existing`.
///
/// An entry is a duplicate when its id or title matches an existing template
/// or one taken earlier from the same batch.
pub fn merge_legacy_custom(
    existing: &[ChallengeTemplate],
    legacy: &[Value],
    source: LegacySource,
) -> Vec<ChallengeTemplate> {
    let mut added: Vec<ChallengeTemplate> = Vec::new();

    for value in legacy {
        if source == LegacySource::Challenges
            && value.get("isCustom").and_then(Value::as_bool) != Some(true)
        {
            continue;
        }
        let Ok(mut template) = migrate_template(value) else {
            continue;
        };
        template.custom = true;

        let duplicate = existing
            .iter()
            .chain(added.iter())
            .any(|t| t.id == template.id || t.title == template.title);
        if !duplicate {
            added.push(template);
        }
    }

    added
}
