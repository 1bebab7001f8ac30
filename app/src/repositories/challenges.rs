//! Challenge template and instance repository

use elevation_tracker_shared::migration::{migrate_template, repair_instances};
use elevation_tracker_shared::{ChallengeInstance, ChallengeKind, ChallengeTemplate};
use serde_json::Value;
use tracing::warn;

use crate::store::{keys, load_json, save_json, KeyValueStore, StoreError};

fn custom_key(kind: ChallengeKind) -> &'static str {
    match kind {
        ChallengeKind::Climbing => keys::CUSTOM_CLIMBING,
        ChallengeKind::Distance => keys::CUSTOM_DISTANCE,
    }
}

pub struct ChallengeRepository;

impl ChallengeRepository {
    /// Custom templates of one kind
    pub fn custom_templates(
        store: &dyn KeyValueStore,
        kind: ChallengeKind,
    ) -> Result<Vec<ChallengeTemplate>, StoreError> {
        let raw: Vec<Value> = load_json(store, custom_key(kind), Vec::new())?;
        Ok(raw
            .iter()
            .filter_map(|value| match migrate_template(value) {
                Ok(template) => Some(ChallengeTemplate {
                    custom: true,
                    ..template
                }),
                Err(e) => {
                    warn!(kind = %kind, error = %e, "Skipping unreadable custom challenge");
                    None
                }
            })
            .collect())
    }

    /// Custom climbing templates followed by custom distance templates
    pub fn all_custom(store: &dyn KeyValueStore) -> Result<Vec<ChallengeTemplate>, StoreError> {
        let mut templates = Self::custom_templates(store, ChallengeKind::Climbing)?;
        templates.extend(Self::custom_templates(store, ChallengeKind::Distance)?);
        Ok(templates)
    }

    pub fn save_custom(
        store: &mut dyn KeyValueStore,
        kind: ChallengeKind,
        templates: &[ChallengeTemplate],
    ) -> Result<(), StoreError> {
        save_json(store, custom_key(kind), templates)
    }

    pub fn clear_custom(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(keys::CUSTOM_CLIMBING)?;
        store.remove(keys::CUSTOM_DISTANCE)
    }

    /// The user's challenge instances; malformed entries are dropped
    pub fn instances(store: &dyn KeyValueStore) -> Result<Vec<ChallengeInstance>, StoreError> {
        let raw: Vec<Value> = load_json(store, keys::MY_CHALLENGES, Vec::new())?;
        let report = repair_instances(&raw);
        if report.dropped > 0 {
            warn!(dropped = report.dropped, "Ignoring malformed challenge instances");
        }
        Ok(report.instances)
    }

    pub fn save_instances(
        store: &mut dyn KeyValueStore,
        instances: &[ChallengeInstance],
    ) -> Result<(), StoreError> {
        save_json(store, keys::MY_CHALLENGES, instances)
    }
}
