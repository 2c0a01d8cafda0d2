//! Input validation for names supplied to ingest mode builders.
//!
//! Field names reach generated SQL verbatim, so the builders reject names
//! that could never be valid identifiers:
//! - empty names
//! - names longer than the identifier limit
//! - names containing control characters

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length for field names
pub const MAX_FIELD_NAME_LENGTH: usize = 255;

/// Maximum length for user-defined function names
pub const MAX_UDF_NAME_LENGTH: usize = 255;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(String),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate the name given to a field of an ingest mode.
///
/// `role` names the purpose of the field in error messages (e.g. `"digest field"`).
///
/// # Rules
///
/// - Must not be empty or blank
/// - Must not exceed 255 characters
/// - Must not contain control characters
///
/// Reserved words are accepted: the SQL generator quotes identifiers.
///
/// # Examples
///
/// ```
/// use ingest_mode_sdk::validation::input::validate_field_name;
///
/// assert!(validate_field_name("digest field", "digest").is_ok());
/// assert!(validate_field_name("digest field", "select").is_ok());
/// assert!(validate_field_name("digest field", "").is_err());
/// assert!(validate_field_name("digest field", "bad\nname").is_err());
/// ```
pub fn validate_field_name(role: &str, name: &str) -> ValidationResult<()> {
    validate_identifier(role, name, MAX_FIELD_NAME_LENGTH)
}

/// Validate the name of a digest or type-conversion UDF.
pub fn validate_udf_name(role: &str, name: &str) -> ValidationResult<()> {
    validate_identifier(role, name, MAX_UDF_NAME_LENGTH)
}

fn validate_identifier(role: &str, name: &str, max: usize) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty(role.to_string()));
    }

    let length = name.chars().count();
    if length > max {
        return Err(ValidationError::TooLong {
            field: role.to_string(),
            max,
            actual: length,
        });
    }

    if let Some(c) = name.chars().find(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters {
            field: role.to_string(),
            reason: format!("control character {:?}", c),
        });
    }

    Ok(())
}

/// Check a name and record the failure as a builder violation.
pub(crate) fn check_name(violations: &mut Vec<String>, role: &str, name: &str) {
    if let Err(e) = validate_field_name(role, name) {
        violations.push(e.to_string());
    }
}
