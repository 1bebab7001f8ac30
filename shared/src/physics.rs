//! Elevation conversion engine
//!
//! Turns a workout's mechanical output energy into the vertical distance the
//! same energy would lift the athlete against gravity, and names the tallest
//! real-world landmark that height reaches.

use serde::Serialize;

use crate::errors::{EngineError, EngineResult};
use crate::units::meters_to_feet;

/// Standard gravity (m/s²)
pub const G: f64 = 9.80665;

/// Share of crank output assumed to reach the climb (crank to wheel losses)
pub const DRIVETRAIN_EFFICIENCY: f64 = 0.955;

/// Joules per kilojoule
const J_PER_KJ: f64 = 1000.0;

/// A named reference height
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landmark {
    pub name: &'static str,
    pub height_meters: f64,
}

/// Reference landmarks, ascending by height
pub const LANDMARKS: &[Landmark] = &[
    Landmark { name: "Statue of Liberty", height_meters: 93.0 },
    Landmark { name: "Great Pyramid of Giza", height_meters: 139.0 },
    Landmark { name: "Eiffel Tower", height_meters: 324.0 },
    Landmark { name: "Empire State Building", height_meters: 443.0 },
    Landmark { name: "Burj Khalifa", height_meters: 828.0 },
    Landmark { name: "Table Mountain", height_meters: 1085.0 },
    Landmark { name: "Ben Nevis", height_meters: 1345.0 },
    Landmark { name: "Mount Fuji", height_meters: 3776.0 },
    Landmark { name: "Matterhorn", height_meters: 4478.0 },
    Landmark { name: "Mont Blanc", height_meters: 4807.0 },
    Landmark { name: "Mount Kilimanjaro", height_meters: 5895.0 },
    Landmark { name: "Denali", height_meters: 6190.0 },
    Landmark { name: "K2", height_meters: 8611.0 },
    Landmark { name: "Mount Everest", height_meters: 8849.0 },
];

/// Result of converting energy into climbed elevation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationResult {
    pub meters: f64,
    pub feet: f64,
    /// Tallest landmark at or below `meters`, `None` below the smallest one
    pub landmark: Option<Landmark>,
    pub landmark_label: String,
}

/// Label used when a height has not reached the smallest landmark
pub fn below_smallest_label() -> String {
    match LANDMARKS.first() {
        Some(first) => format!("Below the {}", first.name),
        None => "Below every landmark".to_string(),
    }
}

/// Tallest landmark whose height does not exceed `meters`
pub fn landmark_for(meters: f64) -> Option<Landmark> {
    LANDMARKS
        .iter()
        .rev()
        .find(|l| meters >= l.height_meters)
        .copied()
}

/// Meters of climb equivalent to `energy_kj` for a mass of `mass_kg`.
///
/// `mass_kg` must already be in kilograms.
pub fn elevation_meters(energy_kj: f64, mass_kg: f64) -> EngineResult<f64> {
    if !energy_kj.is_finite() || energy_kj < 0.0 {
        return Err(EngineError::invalid(format!(
            "energy must be a non-negative number of kJ, got {}",
            energy_kj
        )));
    }
    if !mass_kg.is_finite() || mass_kg <= 0.0 {
        return Err(EngineError::invalid(format!(
            "mass must be a positive number of kg, got {}",
            mass_kg
        )));
    }

    // E_useful = m * g * h
    Ok(energy_kj * J_PER_KJ * DRIVETRAIN_EFFICIENCY / (mass_kg * G))
}

/// Convert output energy into elevation with feet and a landmark label
pub fn convert_energy_to_elevation(energy_kj: f64, mass_kg: f64) -> EngineResult<ElevationResult> {
    let meters = elevation_meters(energy_kj, mass_kg)?;
    let landmark = landmark_for(meters);
    let landmark_label = match &landmark {
        Some(l) => l.name.to_string(),
        None => below_smallest_label(),
    };

    Ok(ElevationResult {
        meters,
        feet: meters_to_feet(meters),
        landmark,
        landmark_label,
    })
}
