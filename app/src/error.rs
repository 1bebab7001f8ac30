//! Application error handling
//!
//! Unifies engine, validation, lookup and storage failures into one error
//! type the CLI can report with a stable code.

use elevation_tracker_shared::validation::ValidationError;
use elevation_tracker_shared::EngineError;
use thiserror::Error;

use crate::store::StoreError;

/// Error type returned by every service
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Engine(EngineError::InvalidArgument(_)) => "INVALID_ARGUMENT",
            AppError::Engine(EngineError::NoCompatibleInput(_)) => "NO_COMPATIBLE_WORKOUTS",
            AppError::Store(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::Engine(EngineError::NoCompatibleInput(_)) => {
                "No compatible workouts selected (check units)".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.user_message())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ValidationError::from_errors(&errors).into()
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
