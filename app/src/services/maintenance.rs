//! Startup maintenance over stored data
//!
//! Older revisions stored workouts with loosely typed metric fields, kept
//! custom goals under `custom_challenges`, and mixed them into a shared
//! `challenges` list. [`MaintenanceService::migrate_legacy_data`] rewrites
//! everything into the current layout and is safe to run on every start.

use elevation_tracker_shared::catalog::all_templates;
use elevation_tracker_shared::migration::{
    merge_legacy_custom, migrate_workout, repair_instances, LegacySource,
};
use elevation_tracker_shared::{ChallengeKind, WorkoutRecord};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::repositories::{ChallengeRepository, WorkoutRepository};
use crate::store::{keys, load_json, save_json, KeyValueStore, StoreError};

/// What a migration run changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub workouts_rewritten: bool,
    pub workouts_dropped: usize,
    pub instances_rewritten: bool,
    pub instances_dropped: usize,
    pub custom_imported: usize,
    pub legacy_keys_removed: Vec<&'static str>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub struct MaintenanceService;

impl MaintenanceService {
    pub fn migrate_legacy_data(store: &mut dyn KeyValueStore) -> AppResult<MigrationReport> {
        let mut report = MigrationReport::default();

        Self::rewrite_workouts(store, &mut report)?;
        Self::rewrite_instances(store, &mut report)?;
        for (key, backup, source) in [
            (keys::LEGACY_CUSTOM, keys::BACKUP_CUSTOM, LegacySource::CustomChallenges),
            (keys::LEGACY_CHALLENGES, keys::BACKUP_CHALLENGES, LegacySource::Challenges),
        ] {
            Self::import_legacy_custom(store, key, backup, source, &mut report)?;
        }

        if report.is_noop() {
            debug!("Stored data already current");
        } else {
            info!(
                workouts_dropped = report.workouts_dropped,
                instances_dropped = report.instances_dropped,
                custom_imported = report.custom_imported,
                legacy_keys = ?report.legacy_keys_removed,
                "Stored data migrated"
            );
        }
        Ok(report)
    }

    fn rewrite_workouts(
        store: &mut dyn KeyValueStore,
        report: &mut MigrationReport,
    ) -> AppResult<()> {
        if store.get(keys::WORKOUT_HISTORY)?.is_none() {
            return Ok(());
        }
        let raw: Vec<Value> = load_json(store, keys::WORKOUT_HISTORY, Vec::new())?;
        let mut workouts: Vec<WorkoutRecord> = Vec::with_capacity(raw.len());
        let mut unreadable: Vec<Value> = Vec::new();
        for value in &raw {
            match migrate_workout(value) {
                Ok(workout) => workouts.push(workout),
                Err(e) => {
                    warn!(error = %e, "Moving unreadable workout to backup");
                    unreadable.push(value.clone());
                }
            }
        }

        if serde_json::to_value(&workouts).map_err(StoreError::from)? == Value::Array(raw) {
            return Ok(());
        }

        // Backup must be written before the history loses anything
        if !unreadable.is_empty() {
            let mut backup: Vec<Value> = load_json(store, keys::BACKUP_WORKOUTS, Vec::new())?;
            backup.extend(unreadable.iter().cloned());
            save_json(store, keys::BACKUP_WORKOUTS, &backup)?;
        }
        WorkoutRepository::save_all(store, &workouts)?;
        report.workouts_rewritten = true;
        report.workouts_dropped = unreadable.len();
        Ok(())
    }

    fn rewrite_instances(
        store: &mut dyn KeyValueStore,
        report: &mut MigrationReport,
    ) -> AppResult<()> {
        if store.get(keys::MY_CHALLENGES)?.is_none() {
            return Ok(());
        }
        let raw: Vec<Value> = load_json(store, keys::MY_CHALLENGES, Vec::new())?;
        let repaired = repair_instances(&raw);

        if serde_json::to_value(&repaired.instances).map_err(StoreError::from)? != Value::Array(raw) {
            ChallengeRepository::save_instances(store, &repaired.instances)?;
            report.instances_rewritten = true;
            report.instances_dropped = repaired.dropped;
        }
        Ok(())
    }

    /// Back up a retired key, fold its custom goals into the per-kind
    /// lists, then remove it
    fn import_legacy_custom(
        store: &mut dyn KeyValueStore,
        key: &'static str,
        backup: &str,
        source: LegacySource,
        report: &mut MigrationReport,
    ) -> AppResult<()> {
        let Some(raw) = store.get(key)? else {
            return Ok(());
        };
        store.set(backup, &raw)?;

        let legacy: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(key, error = %e, "Legacy challenge list unreadable, kept only as backup");
                Vec::new()
            }
        };

        let existing = all_templates(&ChallengeRepository::all_custom(store)?);
        let added = merge_legacy_custom(&existing, &legacy, source);
        for kind in [ChallengeKind::Climbing, ChallengeKind::Distance] {
            let of_kind: Vec<_> = added.iter().filter(|t| t.kind == kind).cloned().collect();
            if of_kind.is_empty() {
                continue;
            }
            let mut custom = ChallengeRepository::custom_templates(store, kind)?;
            custom.extend(of_kind);
            ChallengeRepository::save_custom(store, kind, &custom)?;
        }

        store.remove(key)?;
        report.custom_imported += added.len();
        report.legacy_keys_removed.push(key);
        info!(key, imported = added.len(), backup, "Imported legacy custom challenges");
        Ok(())
    }
}
