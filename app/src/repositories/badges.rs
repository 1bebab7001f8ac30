//! Unlocked badge repository

use std::collections::BTreeSet;

use crate::store::{keys, load_json, save_json, KeyValueStore, StoreError};

pub struct BadgeRepository;

impl BadgeRepository {
    pub fn unlocked(store: &dyn KeyValueStore) -> Result<BTreeSet<String>, StoreError> {
        load_json(store, keys::UNLOCKED_BADGES, BTreeSet::new())
    }

    pub fn save(store: &mut dyn KeyValueStore, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        save_json(store, keys::UNLOCKED_BADGES, unlocked)
    }
}
