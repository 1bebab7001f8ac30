//! Workout logging service

use chrono::{DateTime, Utc};
use elevation_tracker_shared::validation::{validate_positive_metric, validate_workout_metrics};
use elevation_tracker_shared::{
    EditWorkoutRequest, LogWorkoutRequest, WorkoutMetrics, WorkoutRecord,
};
use std::collections::BTreeSet;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repositories::WorkoutRepository;
use crate::store::KeyValueStore;

pub struct WorkoutService;

impl WorkoutService {
    /// Log a new workout and return it with its assigned id
    pub fn log_workout(
        store: &mut dyn KeyValueStore,
        request: LogWorkoutRequest,
        now: DateTime<Utc>,
    ) -> AppResult<WorkoutRecord> {
        request.validate()?;
        validate_workout_metrics(request.energy_kj, request.distance_miles)
            .map_err(AppError::Validation)?;

        let mut history = WorkoutRepository::list(store)?;
        let record = WorkoutRecord {
            id: Self::next_id(&history, now),
            workout_type: request.workout_type,
            date: request.date,
            title: request.title.trim().to_string(),
            metrics: WorkoutMetrics::from_options(request.energy_kj, request.distance_miles)?,
        };

        history.insert(0, record.clone());
        WorkoutRepository::save_all(store, &history)?;

        info!(
            workout_id = record.id,
            energy_kj = ?record.energy_kj(),
            distance_miles = ?record.distance_miles(),
            "Workout logged"
        );
        Ok(record)
    }

    /// Millisecond timestamp, moved past the largest id on collision
    fn next_id(history: &[WorkoutRecord], now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        if history.iter().any(|w| w.id == candidate) {
            let max = history.iter().map(|w| w.id).max().unwrap_or(candidate);
            debug!(candidate, max, "Workout id collision, bumping");
            max + 1
        } else {
            candidate
        }
    }

    /// Replace title, date and metrics of an existing workout.
    ///
    /// The metrics become a single value of the chosen kind.
    pub fn edit_workout(
        store: &mut dyn KeyValueStore,
        request: EditWorkoutRequest,
    ) -> AppResult<WorkoutRecord> {
        request.validate()?;
        validate_positive_metric(request.value).map_err(AppError::Validation)?;

        let mut history = WorkoutRepository::list(store)?;
        let workout = history
            .iter_mut()
            .find(|w| w.id == request.id)
            .ok_or_else(|| AppError::NotFound(format!("workout {}", request.id)))?;

        workout.title = request.title.trim().to_string();
        workout.date = request.date;
        workout.metrics = WorkoutMetrics::single(request.metric, request.value)?;
        let updated = workout.clone();

        WorkoutRepository::save_all(store, &history)?;
        info!(workout_id = updated.id, "Workout updated");
        Ok(updated)
    }

    pub fn delete_workout(store: &mut dyn KeyValueStore, id: i64) -> AppResult<()> {
        let removed = Self::delete_workouts(store, &[id])?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("workout {}", id)));
        }
        Ok(())
    }

    /// Delete every listed workout; unknown ids are ignored
    pub fn delete_workouts(store: &mut dyn KeyValueStore, ids: &[i64]) -> AppResult<usize> {
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        let history = WorkoutRepository::list(store)?;
        let before = history.len();
        let kept: Vec<WorkoutRecord> = history.into_iter().filter(|w| !ids.contains(&w.id)).collect();
        let removed = before - kept.len();

        if removed > 0 {
            WorkoutRepository::save_all(store, &kept)?;
            info!(removed, "Workouts deleted");
        }
        Ok(removed)
    }

    /// History sorted newest first by date, then by id
    pub fn list_workouts(store: &dyn KeyValueStore) -> AppResult<Vec<WorkoutRecord>> {
        let mut history = WorkoutRepository::list(store)?;
        history.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone};
    use elevation_tracker_shared::{MetricKind, WorkoutType};
    use proptest::prelude::*;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn request(title: &str, day: u32, energy_kj: Option<f64>, miles: Option<f64>) -> LogWorkoutRequest {
        LogWorkoutRequest {
            workout_type: WorkoutType::Bike,
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            title: title.to_string(),
            energy_kj,
            distance_miles: miles,
        }
    }

    #[test]
    fn test_log_assigns_timestamp_id() {
        let mut store = MemoryStore::new();
        let record =
            WorkoutService::log_workout(&mut store, request("Climb", 1, Some(600.0), None), at(1_720_000_000_000))
                .unwrap();
        assert_eq!(record.id, 1_720_000_000_000);
        assert_eq!(record.metrics, WorkoutMetrics::Energy { energy_kj: 600.0 });
    }

    #[test]
    fn test_colliding_ids_are_bumped() {
        let mut store = MemoryStore::new();
        let now = at(1_720_000_000_000);
        let a = WorkoutService::log_workout(&mut store, request("A", 1, Some(100.0), None), now).unwrap();
        let b = WorkoutService::log_workout(&mut store, request("B", 1, Some(100.0), None), now).unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn test_log_rejects_missing_or_bad_metrics() {
        let mut store = MemoryStore::new();
        let now = at(1);
        assert!(matches!(
            WorkoutService::log_workout(&mut store, request("Nothing", 1, None, None), now),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            WorkoutService::log_workout(&mut store, request("Zero", 1, Some(0.0), None), now),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            WorkoutService::log_workout(&mut store, request("", 1, Some(10.0), None), now),
            Err(AppError::Validation(_))
        ));
        assert!(WorkoutService::list_workouts(&store).unwrap().is_empty());
    }

    #[test]
    fn test_edit_replaces_metrics_with_single_kind() {
        let mut store = MemoryStore::new();
        let record =
            WorkoutService::log_workout(&mut store, request("Both", 2, Some(500.0), Some(12.0)), at(10)).unwrap();

        let updated = WorkoutService::edit_workout(
            &mut store,
            EditWorkoutRequest {
                id: record.id,
                date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
                title: "Renamed".to_string(),
                metric: MetricKind::Distance,
                value: 15.0,
            },
        )
        .unwrap();

        assert_eq!(updated.metrics, WorkoutMetrics::Distance { distance_miles: 15.0 });
        assert_eq!(updated.energy_kj(), None);
        let stored = WorkoutService::list_workouts(&store).unwrap();
        assert_eq!(stored[0].title, "Renamed");
    }

    #[test]
    fn test_edit_unknown_workout() {
        let mut store = MemoryStore::new();
        let result = WorkoutService::edit_workout(
            &mut store,
            EditWorkoutRequest {
                id: 42,
                date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
                title: "Ghost".to_string(),
                metric: MetricKind::Energy,
                value: 15.0,
            },
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_list_order() {
        let mut store = MemoryStore::new();
        let old = WorkoutService::log_workout(&mut store, request("Old", 1, Some(100.0), None), at(100)).unwrap();
        let new = WorkoutService::log_workout(&mut store, request("New", 9, Some(100.0), None), at(50)).unwrap();
        let mid = WorkoutService::log_workout(&mut store, request("Mid", 5, None, Some(3.0)), at(200)).unwrap();

        let ids: Vec<i64> = WorkoutService::list_workouts(&store).unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);

        assert_eq!(WorkoutService::delete_workouts(&mut store, &[old.id, mid.id, 999]).unwrap(), 2);
        assert!(matches!(
            WorkoutService::delete_workout(&mut store, old.id),
            Err(AppError::NotFound(_))
        ));
        WorkoutService::delete_workout(&mut store, new.id).unwrap();
        assert!(WorkoutService::list_workouts(&store).unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_ids_stay_unique(clock in proptest::collection::vec(0i64..5, 1..20)) {
            let mut store = MemoryStore::new();
            for millis in &clock {
                WorkoutService::log_workout(&mut store, request("Spin", 1, Some(50.0), None), at(*millis))
                    .unwrap();
            }
            let ids: BTreeSet<i64> =
                WorkoutService::list_workouts(&store).unwrap().iter().map(|w| w.id).collect();
            prop_assert_eq!(ids.len(), clock.len());
        }
    }
}
