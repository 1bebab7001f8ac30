//! Elevation Tracker Shared Library
//!
//! The pure conversion and progress-accounting engine: models, unit
//! conversion, the energy-to-elevation physics, landmark comparisons,
//! challenge progress, badges, the challenge catalog and legacy migration.
//! Nothing in this crate performs I/O.

pub mod badges;
pub mod catalog;
pub mod comparisons;
pub mod errors;
pub mod migration;
pub mod models;
pub mod physics;
pub mod progress;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;

// Export units module items (canonical source for unit types)
pub use units::*;

pub use badges::{evaluate_badges, unlock, BADGE_CATALOG};
pub use comparisons::{find_best_comparison, CLIMBING_FACTS, DISTANCE_FACTS};
pub use physics::{convert_energy_to_elevation, ElevationResult, Landmark, LANDMARKS};
pub use progress::{
    achievement_facts, apply_contribution, compute_challenge_contribution,
    compute_lifetime_totals, cumulative_climbing_progress, record_progress, AchievementFacts,
    LifetimeTotals,
};
