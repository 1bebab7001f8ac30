//! Configuration management for the Elevation Tracker
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: ET__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub profile: ProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding every stored key
    pub path: String,
}

/// Profile defaults used before the user saves their own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub default_mass_kg: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: "elevation_tracker_app=info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                path: "elevation-tracker.json".to_string(),
            },
            profile: ProfileConfig {
                default_mass_kg: 80.0,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with ET__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new(&format!("config/{}.toml", env)))
    }

    /// Load with an explicit config file; a missing file is skipped
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::from(config_file).required(false))
            // e.g., ET__STORE__PATH=/tmp/store.json sets store.path
            .add_source(
                config::Environment::with_prefix("ET")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.path.trim().is_empty() {
            anyhow::bail!("store.path cannot be empty");
        }
        elevation_tracker_shared::validation::validate_mass_kg(self.profile.default_mass_kg)
            .map_err(|e| anyhow::anyhow!("profile.default_mass_kg: {}", e))?;
        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.path, "elevation-tracker.json");
        assert_eq!(config.profile.default_mass_kg, 80.0);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.profile.default_mass_kg, 80.0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[store]\npath = \"/tmp/rides.json\"\n\n[profile]\ndefault_mass_kg = 68.5\n\n[logging]\njson = true\nfilter = \"debug\""
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.store.path, "/tmp/rides.json");
        assert_eq!(config.profile.default_mass_kg, 68.5);
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_mass_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[profile]\ndefault_mass_kg = 5.0").unwrap();
        assert!(AppConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
