//! Progress aggregation engine
//!
//! Rolls workout records into challenge contributions and lifetime totals.
//! Every function takes its inputs explicitly and returns new values; nothing
//! here touches persisted state.

use serde::{Deserialize, Serialize};

use crate::badges::evaluate_badges;
use crate::comparisons::{find_best_comparison, CLIMBING_FACTS, DISTANCE_FACTS};
use crate::errors::{EngineError, EngineResult};
use crate::models::{ChallengeInstance, ChallengeKind, ChallengeStatus, WorkoutRecord};
use crate::physics::elevation_meters;
use crate::types::{ProgressUpdate, Snapshot};
use crate::units::{meters_to_feet, miles_to_km, MILES_PER_KM};

/// Contribution of `selected` workouts to a challenge of `kind`, in the
/// challenge's native unit (meters for climbing, km for distance).
///
/// Climbing sums the selected energy first and converts the total once.
/// Workouts lacking the metric the kind needs are skipped; if every selected
/// workout lacks it the result is [`EngineError::NoCompatibleInput`] rather
/// than a zero.
pub fn compute_challenge_contribution(
    selected: &[WorkoutRecord],
    kind: ChallengeKind,
    default_mass_kg: f64,
) -> EngineResult<f64> {
    if selected.is_empty() {
        return Err(EngineError::invalid("no workouts selected"));
    }

    match kind {
        ChallengeKind::Climbing => {
            let energies: Vec<f64> = selected.iter().filter_map(|w| w.energy_kj()).collect();
            if energies.is_empty() {
                return Err(EngineError::NoCompatibleInput(kind));
            }
            elevation_meters(energies.iter().sum(), default_mass_kg)
        }
        ChallengeKind::Distance => {
            let miles: Vec<f64> = selected.iter().filter_map(|w| w.distance_miles()).collect();
            if miles.is_empty() {
                return Err(EngineError::NoCompatibleInput(kind));
            }
            Ok(miles.iter().map(|m| miles_to_km(*m)).sum())
        }
    }
}

/// All-time totals across the whole workout history
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LifetimeTotals {
    pub climbing_meters: f64,
    pub climbing_feet: f64,
    pub distance_km: f64,
    pub distance_miles: f64,
}

/// Recompute lifetime climbing and distance from the full history.
///
/// Each energy-bearing workout is converted on its own and the meters summed;
/// each distance-bearing workout adds its miles converted to km.
pub fn compute_lifetime_totals(
    history: &[WorkoutRecord],
    default_mass_kg: f64,
) -> EngineResult<LifetimeTotals> {
    let mut climbing_meters = 0.0;
    let mut distance_km = 0.0;

    for workout in history {
        if let Some(kj) = workout.energy_kj() {
            climbing_meters += elevation_meters(kj, default_mass_kg)?;
        }
        if let Some(miles) = workout.distance_miles() {
            distance_km += miles_to_km(miles);
        }
    }

    Ok(LifetimeTotals {
        climbing_meters,
        climbing_feet: meters_to_feet(climbing_meters),
        distance_km,
        distance_miles: distance_km * MILES_PER_KM,
    })
}

/// Lifetime totals with their landmark comparisons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementFacts {
    pub totals: LifetimeTotals,
    pub climbing_comparison: &'static str,
    pub distance_comparison: &'static str,
}

pub fn achievement_facts(totals: LifetimeTotals) -> EngineResult<AchievementFacts> {
    Ok(AchievementFacts {
        climbing_comparison: find_best_comparison(totals.climbing_meters, CLIMBING_FACTS)?,
        distance_comparison: find_best_comparison(totals.distance_km, DISTANCE_FACTS)?,
        totals,
    })
}

/// New copy of `instance` with `contribution` added to its progress.
///
/// The instance becomes `Completed` once progress reaches the target and
/// stays completed afterwards.
pub fn apply_contribution(
    instance: &ChallengeInstance,
    contribution: f64,
) -> EngineResult<ChallengeInstance> {
    if !contribution.is_finite() || contribution < 0.0 {
        return Err(EngineError::invalid(format!(
            "contribution must be a non-negative number, got {}",
            contribution
        )));
    }

    let mut next = instance.clone();
    next.progress += contribution;
    if next.is_complete() {
        next.status = ChallengeStatus::Completed;
    }
    Ok(next)
}

/// Sum of progress over every climbing instance
pub fn cumulative_climbing_progress(instances: &[ChallengeInstance]) -> f64 {
    instances
        .iter()
        .filter(|c| c.kind == ChallengeKind::Climbing)
        .map(|c| c.progress)
        .sum()
}

/// Add the selected workouts to one challenge instance of `snapshot`.
///
/// Returns the updated instance and the badges the new cumulative climbing
/// total unlocks; `snapshot` itself is left untouched for the caller to
/// persist from the returned values.
pub fn record_progress(
    snapshot: &Snapshot,
    instance_id: &str,
    workout_ids: &[i64],
) -> EngineResult<ProgressUpdate> {
    let current = snapshot.find_instance(instance_id).ok_or_else(|| {
        EngineError::invalid(format!("unknown challenge instance '{}'", instance_id))
    })?;
    let selected = snapshot.selected_workouts(workout_ids);
    let contribution =
        compute_challenge_contribution(&selected, current.kind, snapshot.default_mass_kg)?;
    let instance = apply_contribution(current, contribution)?;
    let completed_now = !current.is_complete() && instance.is_complete();

    let instances: Vec<ChallengeInstance> = snapshot
        .instances
        .iter()
        .map(|c| {
            if c.instance_id == instance_id {
                instance.clone()
            } else {
                c.clone()
            }
        })
        .collect();
    let newly_unlocked = evaluate_badges(
        cumulative_climbing_progress(&instances),
        &snapshot.unlocked_badges,
    );

    Ok(ProgressUpdate {
        instance,
        contribution,
        completed_now,
        newly_unlocked,
    })
}
