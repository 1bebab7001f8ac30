//! Profile and unit preference service

use elevation_tracker_shared::validation::validate_mass_kg;
use elevation_tracker_shared::{DistanceUnit, UnitPreferences, WeightUnit};
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::repositories::SettingsRepository;
use crate::store::KeyValueStore;

/// Effective profile: saved values or configured defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Profile {
    /// Body weight in the preferred weight unit
    pub body_weight: f64,
    pub units: UnitPreferences,
    /// The same weight normalized to kg
    pub mass_kg: f64,
    /// No weight has been saved yet
    pub is_default: bool,
}

pub struct SettingsService;

impl SettingsService {
    /// Current profile; `default_mass_kg` applies until a weight is saved
    pub fn profile(store: &dyn KeyValueStore, default_mass_kg: f64) -> AppResult<Profile> {
        let units = SettingsRepository::units(store)?;
        let profile = match SettingsRepository::body_weight(store)? {
            Some(body_weight) => Profile {
                body_weight,
                units,
                mass_kg: units.mass_kg(body_weight),
                is_default: false,
            },
            None => Profile {
                body_weight: units.weight.from_kg(default_mass_kg),
                units,
                mass_kg: default_mass_kg,
                is_default: true,
            },
        };
        Ok(profile)
    }

    /// Body mass in kg used for every conversion
    pub fn mass_kg(store: &dyn KeyValueStore, default_mass_kg: f64) -> AppResult<f64> {
        Ok(Self::profile(store, default_mass_kg)?.mass_kg)
    }

    /// Save body weight, given in the preferred weight unit
    pub fn set_body_weight(store: &mut dyn KeyValueStore, value: f64) -> AppResult<Profile> {
        let units = SettingsRepository::units(store)?;
        validate_mass_kg(units.mass_kg(value)).map_err(AppError::Validation)?;
        SettingsRepository::set_body_weight(store, value)?;
        info!(body_weight = value, unit = %units.weight, "Saved body weight");
        Self::profile(store, units.mass_kg(value))
    }

    /// Change unit preferences.
    ///
    /// A saved body weight is re-expressed in the new weight unit so the
    /// underlying mass stays the same.
    pub fn set_units(
        store: &mut dyn KeyValueStore,
        weight: Option<WeightUnit>,
        distance: Option<DistanceUnit>,
        default_mass_kg: f64,
    ) -> AppResult<Profile> {
        let current = SettingsRepository::units(store)?;
        let next = UnitPreferences {
            weight: weight.unwrap_or(current.weight),
            distance: distance.unwrap_or(current.distance),
        };

        if let Some(saved) = SettingsRepository::body_weight(store)? {
            if next.weight != current.weight {
                let converted = next.weight.from_kg(current.mass_kg(saved));
                SettingsRepository::set_body_weight(store, (converted * 10.0).round() / 10.0)?;
            }
        }
        SettingsRepository::set_units(store, next)?;
        info!(weight = %next.weight, distance = %next.distance, "Saved unit preferences");
        Self::profile(store, default_mass_kg)
    }
}
