//! Field and record decode errors.

use crate::common::{ErrorCategory, ErrorSeverity};

/// A single field of a stored record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Integer column did not hold a base-10 integer
    #[error("Field '{field}' is not an integer: '{raw}'")]
    InvalidInteger {
        /// Field name
        field: String,
        /// Raw stored value
        raw: String,
    },

    /// Timestamp column did not hold a recognised date/time
    #[error("Field '{field}' is not a timestamp: '{raw}'")]
    InvalidTimestamp {
        /// Field name
        field: String,
        /// Raw stored value
        raw: String,
    },

    /// Document column did not hold valid JSON
    #[error("Field '{field}' is not valid JSON: {reason}")]
    InvalidDocument {
        /// Field name
        field: String,
        /// Parser message
        reason: String,
    },

    /// Scalar value of the legacy representation did not hold valid JSON
    #[error("Scalar value for '{key}' is not valid JSON: {reason}")]
    InvalidScalar {
        /// Store key
        key: String,
        /// Parser message
        reason: String,
    },
}

impl DecodeError {
    /// Decode failures always classify as [`ErrorCategory::Decode`].
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Decode
    }

    /// Absorbed failures are warnings.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    /// Name of the offending field, when the failure is field-scoped.
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::InvalidInteger { field, .. }
            | DecodeError::InvalidTimestamp { field, .. }
            | DecodeError::InvalidDocument { field, .. } => Some(field),
            DecodeError::InvalidScalar { .. } => None,
        }
    }

    /// Create an invalid integer error.
    pub fn invalid_integer(field: impl Into<String>, raw: impl Into<String>) -> Self {
        DecodeError::InvalidInteger {
            field: field.into(),
            raw: raw.into(),
        }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(field: impl Into<String>, raw: impl Into<String>) -> Self {
        DecodeError::InvalidTimestamp {
            field: field.into(),
            raw: raw.into(),
        }
    }

    /// Create an invalid document error.
    pub fn invalid_document(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::InvalidDocument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
