//! Application state
//!
//! Owns the opened store and the loaded configuration for one process run.
//! Commands borrow the store through [`AppState::store`] and
//! [`AppState::store_mut`] and hand it to the services.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::services::SettingsService;
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

pub struct AppState {
    store: Box<dyn KeyValueStore>,
    config: AppConfig,
}

impl AppState {
    /// Open the JSON file store named by `config.store.path`
    pub fn open(config: AppConfig) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(&config.store.path)?;
        Ok(Self::new(Box::new(store), config))
    }

    /// State backed by a throwaway in-memory store
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Box::new(MemoryStore::new()), config)
    }

    pub fn new(store: Box<dyn KeyValueStore>, config: AppConfig) -> Self {
        Self { store, config }
    }

    #[inline]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Body mass in kg: the saved weight, or the configured default
    pub fn mass_kg(&self) -> AppResult<f64> {
        SettingsService::mass_kg(self.store(), self.config.profile.default_mass_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::keys;

    #[test]
    fn test_mass_uses_config_default() {
        let mut config = AppConfig::default();
        config.profile.default_mass_kg = 72.0;
        let mut state = AppState::in_memory(config);
        assert_eq!(state.mass_kg().unwrap(), 72.0);

        SettingsService::set_body_weight(state.store_mut(), 65.0).unwrap();
        assert_eq!(state.mass_kg().unwrap(), 65.0);
    }

    #[test]
    fn test_open_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.path = dir.path().join("store.json").display().to_string();

        let mut state = AppState::open(config.clone()).unwrap();
        state.store_mut().set(keys::BODY_WEIGHT, "70").unwrap();

        let reopened = AppState::open(config).unwrap();
        assert_eq!(reopened.mass_kg().unwrap(), 70.0);
    }
}
