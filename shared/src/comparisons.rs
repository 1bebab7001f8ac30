//! Landmark comparisons for climbed height and covered distance

use serde::Serialize;

use crate::errors::{EngineError, EngineResult};

/// A threshold and the phrase describing a value that reached it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonFact {
    pub threshold: f64,
    pub label: &'static str,
}

const fn fact(threshold: f64, label: &'static str) -> ComparisonFact {
    ComparisonFact { threshold, label }
}

/// Climbing comparisons in meters, ascending
pub const CLIMBING_FACTS: &[ComparisonFact] = &[
    fact(0.0, "Just getting started!"),
    fact(324.0, "Height of the Eiffel Tower 🗼"),
    fact(443.0, "Height of the Empire State Building 🏙️"),
    fact(828.0, "Height of Burj Khalifa (world's tallest building) 🏗️"),
    fact(2000.0, "2x the height of Burj Khalifa"),
    fact(4807.0, "Summit of Mont Blanc 🏔️"),
    fact(5895.0, "Summit of Mount Kilimanjaro 🦁"),
    fact(8611.0, "Summit of K2 ⛰️"),
    fact(8849.0, "Summit of Mount Everest! 🧗"),
    fact(10000.0, "Higher than Mount Everest! Into the stratosphere! ✈️"),
    fact(20000.0, "Twice the height of Everest!"),
    fact(30000.0, "You've climbed to cruising altitude! 🛫"),
];

/// Distance comparisons in kilometers, ascending
pub const DISTANCE_FACTS: &[ComparisonFact] = &[
    fact(0.0, "Start your journey!"),
    fact(42.195, "Distance of a Marathon 🏃"),
    fact(100.0, "Distance of an Ultra Marathon 🏃‍♂️"),
    fact(160.9, "A Century Ride 🚴"),
    fact(400.0, "Distance from Los Angeles to San Francisco 🌉"),
    fact(1000.0, "Distance from New York to Miami ✈️"),
    fact(3500.0, "Distance of Tour de France 🇫🇷"),
    fact(4828.0, "Distance from Los Angeles to New York 🗽"),
    fact(9000.0, "Distance from Los Angeles to Paris 🇫🇷"),
    fact(12000.0, "Distance from London to Sydney 🦘"),
    fact(20000.0, "Halfway around the world 🌍"),
    fact(40075.0, "Around the entire Earth! 🌎"),
    fact(80000.0, "Around the world twice! 🚀"),
    fact(384400.0, "Distance to the Moon! 🌙"),
];

/// Label of the highest threshold not exceeding `value`.
///
/// `table` must be ascending by threshold and start with a zero baseline; the
/// comparison is inclusive, so a value equal to a threshold gets its label.
pub fn find_best_comparison(value: f64, table: &[ComparisonFact]) -> EngineResult<&'static str> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::invalid(format!(
            "comparison value must be a non-negative number, got {}",
            value
        )));
    }
    let baseline = table
        .first()
        .ok_or_else(|| EngineError::invalid("comparison table is empty"))?;

    Ok(table
        .iter()
        .rev()
        .find(|f| value >= f.threshold)
        .unwrap_or(baseline)
        .label)
}
