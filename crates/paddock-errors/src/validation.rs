//! Input validation error types.

use crate::common::ErrorSeverity;

/// Caller input rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Value is required but missing
    #[error("Required field '{0}' is missing")]
    Required(String),

    /// Value too long
    #[error("Field '{field}' value is too long: {actual} bytes (max: {max})")]
    TooLong {
        /// Field name
        field: String,
        /// Actual length
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Invalid characters
    #[error("Field '{field}' contains invalid characters: {reason}")]
    InvalidCharacters {
        /// Field name
        field: String,
        /// Reason for the error
        reason: String,
    },

    /// Invalid enum value
    #[error("Invalid value '{value}' for field '{field}', expected one of: {expected}")]
    InvalidEnumValue {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Expected values
        expected: String,
    },
}

impl ValidationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    /// Create a required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required(field.into())
    }

    /// Create a too long error.
    pub fn too_long(field: impl Into<String>, actual: usize, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            actual,
            max,
        }
    }

    /// Create an invalid characters error.
    pub fn invalid_characters(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidCharacters {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid enum value error.
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}
