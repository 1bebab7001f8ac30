//! Calculator, lifetime facts, and badges

use elevation_tracker_shared::{
    achievement_facts, compute_lifetime_totals, convert_energy_to_elevation, evaluate_badges,
    unlock, AchievementFacts, BadgeStatus, CalculationResult, BADGE_CATALOG,
};
use tracing::info;

use crate::error::AppResult;
use crate::repositories::{BadgeRepository, WorkoutRepository};
use crate::store::KeyValueStore;

pub struct AchievementService;

impl AchievementService {
    /// Convert one energy value and unlock any badge its height reaches
    pub fn calculate(
        store: &mut dyn KeyValueStore,
        energy_kj: f64,
        mass_kg: f64,
    ) -> AppResult<CalculationResult> {
        let elevation = convert_energy_to_elevation(energy_kj, mass_kg)?;

        let unlocked = BadgeRepository::unlocked(store)?;
        let newly_unlocked = evaluate_badges(elevation.meters, &unlocked);
        if !newly_unlocked.is_empty() {
            BadgeRepository::save(store, &unlock(&unlocked, &newly_unlocked))?;
        }

        info!(
            energy_kj,
            meters = elevation.meters,
            landmark = %elevation.landmark_label,
            unlocked = newly_unlocked.len(),
            "Elevation calculated"
        );
        Ok(CalculationResult {
            elevation,
            newly_unlocked,
        })
    }

    /// Totals over the whole workout history with landmark comparisons
    pub fn lifetime_facts(store: &dyn KeyValueStore, mass_kg: f64) -> AppResult<AchievementFacts> {
        let history = WorkoutRepository::list(store)?;
        let totals = compute_lifetime_totals(&history, mass_kg)?;
        Ok(achievement_facts(totals)?)
    }

    pub fn badges(store: &dyn KeyValueStore) -> AppResult<Vec<BadgeStatus>> {
        let unlocked = BadgeRepository::unlocked(store)?;
        Ok(BADGE_CATALOG
            .iter()
            .map(|badge| BadgeStatus {
                badge,
                unlocked: unlocked.contains(badge.id),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::WorkoutService;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use elevation_tracker_shared::{EngineError, LogWorkoutRequest, WorkoutType};

    #[test]
    fn test_calculate_unlocks_once() {
        let mut store = MemoryStore::new();
        let first = AchievementService::calculate(&mut store, 500.0, 80.0).unwrap();
        assert!((first.elevation.meters - 608.643114621201).abs() < 1e-9);
        assert_eq!(first.elevation.landmark_label, "Empire State Building");
        let ids: Vec<&str> = first.newly_unlocked.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["first-ride", "eiffel"]);

        let again = AchievementService::calculate(&mut store, 500.0, 80.0).unwrap();
        assert!(again.newly_unlocked.is_empty());

        let statuses = AchievementService::badges(&store).unwrap();
        assert_eq!(statuses.len(), BADGE_CATALOG.len());
        assert_eq!(statuses.iter().filter(|s| s.unlocked).count(), 2);
    }

    #[test]
    fn test_calculate_rejects_bad_mass() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            AchievementService::calculate(&mut store, 500.0, 0.0),
            Err(AppError::Engine(EngineError::InvalidArgument(_)))
        ));
        assert!(BadgeRepository::unlocked(&store).unwrap().is_empty());
    }

    #[test]
    fn test_lifetime_facts() {
        let mut store = MemoryStore::new();
        let empty = AchievementService::lifetime_facts(&store, 80.0).unwrap();
        assert_eq!(empty.totals.climbing_meters, 0.0);
        assert_eq!(empty.climbing_comparison, "Just getting started!");

        for (millis, energy_kj, miles) in [(1, Some(500.0), None), (2, None, Some(26.3))] {
            WorkoutService::log_workout(
                &mut store,
                LogWorkoutRequest {
                    workout_type: WorkoutType::Bike,
                    date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                    title: "Session".to_string(),
                    energy_kj,
                    distance_miles: miles,
                },
                Utc.timestamp_millis_opt(millis).unwrap(),
            )
            .unwrap();
        }

        let facts = AchievementService::lifetime_facts(&store, 80.0).unwrap();
        assert!((facts.totals.climbing_meters - 608.643114621201).abs() < 1e-9);
        assert!((facts.totals.distance_km - 26.3 * 1.60934).abs() < 1e-9);
        assert_eq!(facts.climbing_comparison, "Height of the Empire State Building 🏙️");
        assert_eq!(facts.distance_comparison, "Distance of a Marathon 🏃");
    }

    #[test]
    fn test_lifetime_facts_ignore_invalid_stored_workouts() {
        let mut store = MemoryStore::new();
        store
            .set(
                crate::store::keys::WORKOUT_HISTORY,
                r#"[
                    {"id": 1, "type": "bike", "date": "2024-01-02", "title": "Good", "metrics": {"kind": "energy", "energy_kj": 500.0}},
                    {"id": 9, "type": "bike", "date": "2024-01-01", "title": "", "metrics": {"kind": "energy", "energy_kj": -500.0}}
                ]"#,
            )
            .unwrap();

        let facts = AchievementService::lifetime_facts(&store, 80.0).unwrap();
        assert!((facts.totals.climbing_meters - 608.643114621201).abs() < 1e-9);
    }
}
