//! Profile and unit preference repository
//!
//! These keys hold bare strings rather than JSON, e.g. `bike_weight = "72.5"`
//! and `unit_weight = "lbs"`.

use elevation_tracker_shared::{DistanceUnit, UnitPreferences, WeightUnit};
use tracing::warn;

use crate::store::{keys, KeyValueStore, StoreError};

pub struct SettingsRepository;

impl SettingsRepository {
    /// Saved body weight in the preferred weight unit
    pub fn body_weight(store: &dyn KeyValueStore) -> Result<Option<f64>, StoreError> {
        let Some(raw) = store.get(keys::BODY_WEIGHT)? else {
            return Ok(None);
        };
        match raw.trim().trim_matches('"').parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
            _ => {
                warn!(value = %raw, "Ignoring unreadable saved body weight");
                Ok(None)
            }
        }
    }

    pub fn set_body_weight(store: &mut dyn KeyValueStore, value: f64) -> Result<(), StoreError> {
        store.set(keys::BODY_WEIGHT, &value.to_string())
    }

    pub fn units(store: &dyn KeyValueStore) -> Result<UnitPreferences, StoreError> {
        let weight = store
            .get(keys::UNIT_WEIGHT)?
            .and_then(|raw| raw.trim_matches('"').parse::<WeightUnit>().ok())
            .unwrap_or_default();
        let distance = store
            .get(keys::UNIT_DISTANCE)?
            .and_then(|raw| raw.trim_matches('"').parse::<DistanceUnit>().ok())
            .unwrap_or_default();
        Ok(UnitPreferences { weight, distance })
    }

    pub fn set_units(store: &mut dyn KeyValueStore, units: UnitPreferences) -> Result<(), StoreError> {
        store.set(keys::UNIT_WEIGHT, units.weight.abbreviation())?;
        store.set(keys::UNIT_DISTANCE, units.distance.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_when_unset() {
        let store = MemoryStore::new();
        assert_eq!(SettingsRepository::body_weight(&store).unwrap(), None);
        assert_eq!(SettingsRepository::units(&store).unwrap(), UnitPreferences::metric());
    }

    #[test]
    fn test_reads_bare_and_quoted_strings() {
        let mut store = MemoryStore::new();
        store.set(keys::BODY_WEIGHT, "\"165\"").unwrap();
        store.set(keys::UNIT_WEIGHT, "lbs").unwrap();
        store.set(keys::UNIT_DISTANCE, "mi").unwrap();

        assert_eq!(SettingsRepository::body_weight(&store).unwrap(), Some(165.0));
        assert_eq!(SettingsRepository::units(&store).unwrap(), UnitPreferences::imperial());
    }

    #[test]
    fn test_garbage_weight_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(keys::BODY_WEIGHT, "heavy").unwrap();
        assert_eq!(SettingsRepository::body_weight(&store).unwrap(), None);
    }
}
