//! Shared threshold validation helpers.
//!
//! Provides reusable range checks used by the engine configuration of the
//! detector, trend analyzer and maintenance predictor.

use crate::error::CoreError;

/// Validate that a value is finite and strictly positive.
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_positive(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a count is at least `min`.
pub fn validate_min_count(value: usize, min: usize, name: &str) -> Result<(), CoreError> {
    if value < min {
        return Err(CoreError::Validation(format!(
            "{name} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

/// Validate that `lower < upper`, naming both fields on failure.
pub fn validate_ascending(
    lower: f64,
    upper: f64,
    lower_name: &str,
    upper_name: &str,
) -> Result<(), CoreError> {
    if lower >= upper {
        return Err(CoreError::Validation(format!(
            "{lower_name} ({lower}) must be less than {upper_name} ({upper})"
        )));
    }
    Ok(())
}
