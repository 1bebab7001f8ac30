//! Data access layer over the key-value store
//!
//! Repositories read tolerant of older blob shapes and always write the
//! current canonical shape.

pub mod badges;
pub mod challenges;
pub mod settings;
pub mod workouts;

pub use badges::BadgeRepository;
pub use challenges::ChallengeRepository;
pub use settings::SettingsRepository;
pub use workouts::WorkoutRepository;
