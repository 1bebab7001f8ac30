//! Challenge catalog and progress service

use chrono::{DateTime, NaiveDate, Utc};
use elevation_tracker_shared::catalog::{self, all_templates, find_template};
use elevation_tracker_shared::validation::{validate_challenge_target, validate_title};
use elevation_tracker_shared::{
    record_progress, unlock, AddProgressRequest, ChallengeInstance, ChallengeKind,
    ChallengeTemplate, CreateChallengeRequest, DistanceUnit, HeightUnit, ProgressUpdate, Snapshot,
};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repositories::{
    BadgeRepository, ChallengeRepository, SettingsRepository, WorkoutRepository,
};
use crate::store::KeyValueStore;

pub struct ChallengeService;

impl ChallengeService {
    /// Built-in templates followed by the user's custom ones
    pub fn list_templates(store: &dyn KeyValueStore) -> AppResult<Vec<ChallengeTemplate>> {
        let custom = ChallengeRepository::all_custom(store)?;
        Ok(all_templates(&custom))
    }

    pub fn create_custom(
        store: &mut dyn KeyValueStore,
        request: CreateChallengeRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ChallengeTemplate> {
        request.validate()?;
        match request.kind {
            ChallengeKind::Climbing => {
                Self::create_custom_climbing(store, &request.title, request.target, request.height_unit, now)
            }
            ChallengeKind::Distance => {
                Self::create_custom_distance(store, &request.title, request.target, request.distance_unit, now)
            }
        }
    }

    pub fn create_custom_climbing(
        store: &mut dyn KeyValueStore,
        title: &str,
        height: f64,
        unit: HeightUnit,
        now: DateTime<Utc>,
    ) -> AppResult<ChallengeTemplate> {
        validate_title(title).map_err(AppError::Validation)?;
        let template = catalog::custom_climbing(title, height, unit, now)?;
        Self::store_custom(store, template)
    }

    pub fn create_custom_distance(
        store: &mut dyn KeyValueStore,
        title: &str,
        distance: f64,
        unit: DistanceUnit,
        now: DateTime<Utc>,
    ) -> AppResult<ChallengeTemplate> {
        validate_title(title).map_err(AppError::Validation)?;
        let template = catalog::custom_distance(title, distance, unit, now)?;
        Self::store_custom(store, template)
    }

    fn store_custom(
        store: &mut dyn KeyValueStore,
        template: ChallengeTemplate,
    ) -> AppResult<ChallengeTemplate> {
        validate_challenge_target(template.kind, template.target_value)
            .map_err(AppError::Validation)?;

        let mut custom = ChallengeRepository::custom_templates(store, template.kind)?;
        if custom.iter().any(|t| t.id == template.id) {
            return Err(AppError::Conflict(format!("challenge {} already exists", template.id)));
        }
        custom.push(template.clone());
        ChallengeRepository::save_custom(store, template.kind, &custom)?;

        info!(
            challenge_id = %template.id,
            kind = %template.kind,
            target = template.target_value,
            "Custom challenge created"
        );
        Ok(template)
    }

    /// Delete a custom template; started instances are kept
    pub fn delete_custom(store: &mut dyn KeyValueStore, id: &str) -> AppResult<()> {
        if catalog::is_builtin(id) {
            return Err(AppError::Validation(format!(
                "built-in challenge '{}' cannot be deleted",
                id
            )));
        }
        for kind in [ChallengeKind::Climbing, ChallengeKind::Distance] {
            let custom = ChallengeRepository::custom_templates(store, kind)?;
            if custom.iter().any(|t| t.id == id) {
                let kept: Vec<ChallengeTemplate> = custom.into_iter().filter(|t| t.id != id).collect();
                ChallengeRepository::save_custom(store, kind, &kept)?;
                info!(challenge_id = id, "Custom challenge deleted");
                return Ok(());
            }
        }
        Err(AppError::NotFound(format!("challenge {}", id)))
    }

    /// Remove every custom template of both kinds, returning how many there were
    pub fn reset_custom_templates(store: &mut dyn KeyValueStore) -> AppResult<usize> {
        let count = ChallengeRepository::all_custom(store)?.len();
        ChallengeRepository::clear_custom(store)?;
        info!(count, "Custom challenges reset");
        Ok(count)
    }

    /// Start a new instance of a template
    pub fn add_to_my_challenges(
        store: &mut dyn KeyValueStore,
        template_id: &str,
        today: NaiveDate,
    ) -> AppResult<ChallengeInstance> {
        let templates = Self::list_templates(store)?;
        let template = find_template(&templates, template_id)
            .ok_or_else(|| AppError::NotFound(format!("challenge {}", template_id)))?;

        let instance = ChallengeInstance::start(template, today);
        let mut instances = ChallengeRepository::instances(store)?;
        instances.push(instance.clone());
        ChallengeRepository::save_instances(store, &instances)?;

        info!(
            instance_id = %instance.instance_id,
            total = instances.len(),
            "Challenge added to my challenges"
        );
        Ok(instance)
    }

    pub fn remove_my_challenge(store: &mut dyn KeyValueStore, instance_id: &str) -> AppResult<()> {
        let instances = ChallengeRepository::instances(store)?;
        let before = instances.len();
        let kept: Vec<ChallengeInstance> = instances
            .into_iter()
            .filter(|c| c.instance_id != instance_id)
            .collect();
        if kept.len() == before {
            return Err(AppError::NotFound(format!("challenge instance {}", instance_id)));
        }
        ChallengeRepository::save_instances(store, &kept)?;
        info!(instance_id, "Challenge removed from my challenges");
        Ok(())
    }

    pub fn list_my_challenges(store: &dyn KeyValueStore) -> AppResult<Vec<ChallengeInstance>> {
        Ok(ChallengeRepository::instances(store)?)
    }

    /// Current persisted state as the engine sees it
    pub fn snapshot(store: &dyn KeyValueStore, mass_kg: f64) -> AppResult<Snapshot> {
        Ok(Snapshot {
            workouts: WorkoutRepository::list(store)?,
            instances: ChallengeRepository::instances(store)?,
            default_mass_kg: mass_kg,
            units: SettingsRepository::units(store)?,
            unlocked_badges: BadgeRepository::unlocked(store)?,
        })
    }

    /// Add the selected workouts to a challenge instance.
    ///
    /// Persists the new progress and any badges the cumulative climbing
    /// total now reaches.
    pub fn add_progress(
        store: &mut dyn KeyValueStore,
        request: AddProgressRequest,
        mass_kg: f64,
    ) -> AppResult<ProgressUpdate> {
        request.validate()?;
        let snapshot = Self::snapshot(store, mass_kg)?;

        if snapshot.find_instance(&request.instance_id).is_none() {
            return Err(AppError::NotFound(format!(
                "challenge instance {}",
                request.instance_id
            )));
        }
        let selected = snapshot.selected_workouts(&request.workout_ids);
        if selected.is_empty() {
            return Err(AppError::NotFound("none of the selected workouts exist".to_string()));
        }
        if selected.len() < request.workout_ids.len() {
            warn!(
                requested = request.workout_ids.len(),
                found = selected.len(),
                "Some selected workouts no longer exist"
            );
        }

        let update = record_progress(&snapshot, &request.instance_id, &request.workout_ids)?;
        Self::ensure_contribution(update.contribution)?;

        let instances: Vec<ChallengeInstance> = snapshot
            .instances
            .iter()
            .map(|c| {
                if c.instance_id == update.instance.instance_id {
                    update.instance.clone()
                } else {
                    c.clone()
                }
            })
            .collect();
        ChallengeRepository::save_instances(store, &instances)?;

        if !update.newly_unlocked.is_empty() {
            let unlocked = unlock(&snapshot.unlocked_badges, &update.newly_unlocked);
            BadgeRepository::save(store, &unlocked)?;
            for badge in &update.newly_unlocked {
                info!(badge = badge.id, "Badge unlocked");
            }
        }

        info!(
            instance_id = %update.instance.instance_id,
            contribution = update.contribution,
            unit = update.instance.kind.unit(),
            progress = update.instance.progress,
            completed = update.completed_now,
            "Progress added"
        );
        Ok(update)
    }

    /// Nothing is persisted for an update that adds no progress
    fn ensure_contribution(contribution: f64) -> AppResult<()> {
        if contribution.is_finite() && contribution > 0.0 {
            Ok(())
        } else {
            Err(AppError::Validation(
                "the selected workouts add no progress to this challenge".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::WorkoutService;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use elevation_tracker_shared::{ChallengeStatus, EngineError, LogWorkoutRequest, WorkoutType};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_720_000_000_000).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()
    }

    fn log(store: &mut MemoryStore, millis: i64, energy_kj: Option<f64>, miles: Option<f64>) -> i64 {
        WorkoutService::log_workout(
            store,
            LogWorkoutRequest {
                workout_type: WorkoutType::Bike,
                date: today(),
                title: "Ride".to_string(),
                energy_kj,
                distance_miles: miles,
            },
            Utc.timestamp_millis_opt(millis).unwrap(),
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_custom_lifecycle() {
        let mut store = MemoryStore::new();
        let created =
            ChallengeService::create_custom_climbing(&mut store, "Local hill", 1000.0, HeightUnit::Feet, now())
                .unwrap();
        assert_eq!(created.target_value, 305.0);

        let templates = ChallengeService::list_templates(&store).unwrap();
        assert_eq!(templates.len(), 10);
        assert_eq!(templates.last().unwrap().id, created.id);

        assert!(matches!(
            ChallengeService::create_custom_climbing(&mut store, "Again", 50.0, HeightUnit::Meters, now()),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ChallengeService::delete_custom(&mut store, "everest"),
            Err(AppError::Validation(_))
        ));
        ChallengeService::delete_custom(&mut store, &created.id).unwrap();
        assert!(matches!(
            ChallengeService::delete_custom(&mut store, &created.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_reset_custom_templates() {
        let mut store = MemoryStore::new();
        ChallengeService::create_custom_distance(&mut store, "Coast", 100.0, DistanceUnit::Miles, now()).unwrap();
        ChallengeService::create_custom_climbing(&mut store, "Hill", 100.0, HeightUnit::Meters, now()).unwrap();
        assert_eq!(ChallengeService::reset_custom_templates(&mut store).unwrap(), 2);
        assert_eq!(ChallengeService::list_templates(&store).unwrap().len(), 9);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut store = MemoryStore::new();
        let a = ChallengeService::add_to_my_challenges(&mut store, "everest", today()).unwrap();
        let b = ChallengeService::add_to_my_challenges(&mut store, "everest", today()).unwrap();
        assert_ne!(a.instance_id, b.instance_id);
        assert!(matches!(
            ChallengeService::add_to_my_challenges(&mut store, "olympus", today()),
            Err(AppError::NotFound(_))
        ));

        ChallengeService::remove_my_challenge(&mut store, &a.instance_id).unwrap();
        let mine = ChallengeService::list_my_challenges(&store).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].instance_id, b.instance_id);
    }

    #[test]
    fn test_add_progress_persists_and_unlocks() {
        let mut store = MemoryStore::new();
        let ride = log(&mut store, 1, Some(500.0), None);
        let instance = ChallengeService::add_to_my_challenges(&mut store, "everest", today()).unwrap();

        let update = ChallengeService::add_progress(
            &mut store,
            AddProgressRequest {
                instance_id: instance.instance_id.clone(),
                workout_ids: vec![ride],
            },
            80.0,
        )
        .unwrap();

        assert!((update.contribution - 608.643114621201).abs() < 1e-9);
        let mine = ChallengeService::list_my_challenges(&store).unwrap();
        assert_eq!(mine[0].progress, update.contribution);

        let unlocked = BadgeRepository::unlocked(&store).unwrap();
        assert!(unlocked.contains("first-ride"));
        assert!(unlocked.contains("eiffel"));
        assert!(!unlocked.contains("montblanc"));
    }

    #[test]
    fn test_add_progress_distance_and_completion() {
        let mut store = MemoryStore::new();
        let run = log(&mut store, 1, None, Some(26.3));
        let energy_only = log(&mut store, 2, Some(300.0), None);
        let marathon = ChallengeService::add_to_my_challenges(&mut store, "marathon", today()).unwrap();

        let update = ChallengeService::add_progress(
            &mut store,
            AddProgressRequest {
                instance_id: marathon.instance_id.clone(),
                workout_ids: vec![run, energy_only],
            },
            80.0,
        )
        .unwrap();
        assert!((update.contribution - 26.3 * 1.60934).abs() < 1e-9);
        assert!(update.completed_now);
        assert_eq!(
            ChallengeService::list_my_challenges(&store).unwrap()[0].status,
            ChallengeStatus::Completed
        );
        assert!(BadgeRepository::unlocked(&store).unwrap().is_empty());
    }

    #[test]
    fn test_add_progress_incompatible_selection_changes_nothing() {
        let mut store = MemoryStore::new();
        let ride = log(&mut store, 1, Some(800.0), None);
        let marathon = ChallengeService::add_to_my_challenges(&mut store, "marathon", today()).unwrap();

        let result = ChallengeService::add_progress(
            &mut store,
            AddProgressRequest {
                instance_id: marathon.instance_id.clone(),
                workout_ids: vec![ride],
            },
            80.0,
        );
        assert!(matches!(
            result,
            Err(AppError::Engine(EngineError::NoCompatibleInput(ChallengeKind::Distance)))
        ));
        assert_eq!(ChallengeService::list_my_challenges(&store).unwrap()[0].progress, 0.0);
    }

    #[test]
    fn test_add_progress_unknown_targets() {
        let mut store = MemoryStore::new();
        let ride = log(&mut store, 1, Some(800.0), None);
        let everest = ChallengeService::add_to_my_challenges(&mut store, "everest", today()).unwrap();

        assert!(matches!(
            ChallengeService::add_progress(
                &mut store,
                AddProgressRequest { instance_id: "my_nothing".to_string(), workout_ids: vec![ride] },
                80.0,
            ),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ChallengeService::add_progress(
                &mut store,
                AddProgressRequest { instance_id: everest.instance_id.clone(), workout_ids: vec![12345] },
                80.0,
            ),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ChallengeService::add_progress(
                &mut store,
                AddProgressRequest { instance_id: everest.instance_id, workout_ids: vec![] },
                80.0,
            ),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_contribution_is_rejected() {
        assert!(ChallengeService::ensure_contribution(608.6).is_ok());
        for empty in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                ChallengeService::ensure_contribution(empty),
                Err(AppError::Validation(_))
            ));
        }
    }
}
