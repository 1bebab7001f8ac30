//! Input validation functions
//!
//! Plain validators return `Result<(), String>` with a user-facing message;
//! request types in [`crate::types`] additionally derive `validator::Validate`.

use crate::models::ChallengeKind;

/// Longest accepted workout or challenge title
pub const MAX_TITLE_LEN: usize = 120;

/// Validate a workout or challenge title
pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(format!("Title must be at most {} characters", MAX_TITLE_LEN));
    }
    Ok(())
}

/// Validate a body mass already normalized to kg
pub fn validate_mass_kg(mass_kg: f64) -> Result<(), String> {
    if mass_kg.is_nan() || mass_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if mass_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if mass_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate a logged energy or distance value
pub fn validate_positive_metric(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Value must be a valid number".to_string());
    }
    if value <= 0.0 {
        return Err("Values must be greater than zero".to_string());
    }
    Ok(())
}

/// Validate an optional pair of workout metrics: at least one, each positive
pub fn validate_workout_metrics(energy_kj: Option<f64>, miles: Option<f64>) -> Result<(), String> {
    if energy_kj.is_none() && miles.is_none() {
        return Err("Please enter at least one value (kJ or miles)".to_string());
    }
    energy_kj.map(validate_positive_metric).transpose()?;
    miles.map(validate_positive_metric).transpose()?;
    Ok(())
}

/// Validate a challenge target in its canonical unit
pub fn validate_challenge_target(kind: ChallengeKind, target: f64) -> Result<(), String> {
    validate_positive_metric(target)?;
    let max = match kind {
        ChallengeKind::Climbing => 100_000.0,
        ChallengeKind::Distance => 1_000_000.0,
    };
    if target > max {
        return Err(format!("Target must be at most {} {}", max, kind.unit()));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "title" => "Description",
        "energy_kj" => "Output (kJ)",
        "distance_miles" | "miles" => "Distance (miles)",
        "mass" | "mass_kg" | "default_mass" => "Body Weight",
        "weight_unit" => "Weight Unit",
        "distance_unit" => "Distance Unit",
        "height" | "target_value" => "Target",
        "workout_ids" => "Selected Workouts",
        "instance_id" => "Challenge",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }

    /// First failing field of a `validator` derive run
    pub fn from_errors(errors: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                Self::new(field, &message)
            }
            None => Self::new("input", "is invalid"),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ValidationError {}
