//! Error types for the elevation tracker core

use thiserror::Error;

use crate::models::ChallengeKind;

/// Errors raised by the pure conversion and aggregation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Non-numeric, negative or zero input where a positive number is required
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// None of the selected workouts carries the metric the challenge needs
    #[error("No compatible workouts selected for a {0} challenge")]
    NoCompatibleInput(ChallengeKind),
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}

/// Errors raised while decoding stored records written by older app revisions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationError {
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Record has no usable metric: {0}")]
    NoMetric(String),
}

/// Convenience alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;
