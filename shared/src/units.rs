//! Unit conversion boundary
//!
//! The engine works exclusively in canonical units: kilograms, kilometers and
//! meters. Everything a user types in pounds, miles or feet passes through this
//! module exactly once, before any core operation sees it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Kilometers per statute mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Miles per kilometer (display only)
pub const MILES_PER_KM: f64 = 0.621371;

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Meters per foot, used when a custom climbing target is entered in feet
pub const METERS_PER_FOOT: f64 = 0.3048;

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Distance Units
// ============================================================================

/// Distance unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "km")]
    Km,
    #[serde(rename = "mi", alias = "miles")]
    Miles,
}

impl DistanceUnit {
    /// Convert from this unit to kilometers
    pub fn to_km(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Km => value,
            DistanceUnit::Miles => value * KM_PER_MILE,
        }
    }

    /// Convert from kilometers to this unit
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            DistanceUnit::Km => km,
            DistanceUnit::Miles => km * MILES_PER_KM,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometer" | "kilometers" => Ok(DistanceUnit::Km),
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            _ => Err(format!("Unknown distance unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units (custom climbing targets)
// ============================================================================

/// Unit a custom climbing target is entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HeightUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
}

impl HeightUnit {
    /// Convert from this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Meters => value,
            HeightUnit::Feet => value * METERS_PER_FOOT,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Meters => "m",
            HeightUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(HeightUnit::Meters),
            "ft" | "foot" | "feet" => Ok(HeightUnit::Feet),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

// ============================================================================
// Boundary helpers
// ============================================================================

/// Convert meters to feet for display
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Convert statute miles to kilometers
pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

/// Complete unit preferences for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitPreferences {
    pub weight: WeightUnit,
    pub distance: DistanceUnit,
}

impl UnitPreferences {
    /// Metric preferences (SI units)
    pub fn metric() -> Self {
        Self {
            weight: WeightUnit::Kg,
            distance: DistanceUnit::Km,
        }
    }

    /// Imperial preferences (US units)
    pub fn imperial() -> Self {
        Self {
            weight: WeightUnit::Lbs,
            distance: DistanceUnit::Miles,
        }
    }

    /// Normalize a body mass typed in the preferred weight unit to kilograms
    pub fn mass_kg(&self, value: f64) -> f64 {
        self.weight.to_kg(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_weight_roundtrip_lbs(lbs in 44.0f64..1100.0) {
            let kg = WeightUnit::Lbs.to_kg(lbs);
            let back = WeightUnit::Lbs.from_kg(kg);
            prop_assert!((lbs - back).abs() < 0.0001,
                "Round-trip failed: {} -> {} -> {}", lbs, kg, back);
        }

        #[test]
        fn prop_kg_identity(kg in 20.0f64..500.0) {
            prop_assert_eq!(WeightUnit::Kg.to_kg(kg), kg);
            prop_assert_eq!(WeightUnit::Kg.from_kg(kg), kg);
        }

        #[test]
        fn prop_miles_always_longer_than_km_value(miles in 0.1f64..1000.0) {
            prop_assert!(DistanceUnit::Miles.to_km(miles) > miles);
        }
    }

    #[test]
    fn test_known_conversions() {
        assert!((WeightUnit::Lbs.to_kg(100.0) - 45.3592).abs() < 1e-9);
        assert!((miles_to_km(26.2) - 42.164708).abs() < 1e-6);
        assert!((meters_to_feet(100.0) - 328.084).abs() < 1e-9);
        assert!((HeightUnit::Feet.to_meters(12388.0) - 3775.8624).abs() < 1e-6);
        assert_eq!(HeightUnit::Meters.to_meters(4807.0), 4807.0);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!("LBS".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("mi".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert_eq!("ft".parse::<HeightUnit>().unwrap(), HeightUnit::Feet);
        assert!("stone".parse::<WeightUnit>().is_err());
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_serde_names_match_stored_preferences() {
        assert_eq!(serde_json::to_string(&WeightUnit::Lbs).unwrap(), "\"lbs\"");
        assert_eq!(serde_json::to_string(&DistanceUnit::Miles).unwrap(), "\"mi\"");
        let unit: DistanceUnit = serde_json::from_str("\"miles\"").unwrap();
        assert_eq!(unit, DistanceUnit::Miles);
    }

    #[test]
    fn test_preferences() {
        let prefs = UnitPreferences::imperial();
        assert_eq!(prefs.weight, WeightUnit::Lbs);
        assert!((prefs.mass_kg(176.0) - 79.832192).abs() < 1e-6);
        assert_eq!(UnitPreferences::default(), UnitPreferences::metric());
    }
}
