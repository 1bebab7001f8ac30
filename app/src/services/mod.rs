//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared engine. Each operation reads what it needs
//! from the store, computes through the engine, and writes the result back.

pub mod achievements;
pub mod challenges;
pub mod maintenance;
pub mod settings;
pub mod workouts;

pub use achievements::AchievementService;
pub use challenges::ChallengeService;
pub use maintenance::{MaintenanceService, MigrationReport};
pub use settings::{Profile, SettingsService};
pub use workouts::WorkoutService;
