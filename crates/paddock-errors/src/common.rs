//! Top-level error type and classification shared by every Paddock crate.

use core::fmt;

use crate::{DecodeError, StoreError, ValidationError};

/// Top-level error returned by the aggregation layer.
///
/// Partial decode failures are deliberately absent: they are absorbed where
/// they happen and only ever show up in logs.
#[derive(Debug, thiserror::Error)]
pub enum PaddockError {
    /// Root entity absent
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity type tag
        kind: String,
        /// Entity identifier
        id: String,
    },

    /// Caller-supplied input rejected before reaching the store
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Store round trip failed
    #[error("Store unavailable: {0}")]
    Store(#[from] StoreError),
}

impl PaddockError {
    /// Create a not-found error for an entity.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::Store(_) => ErrorCategory::Transient,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::InvalidInput(e) => e.severity(),
            Self::Store(e) => e.severity(),
        }
    }

    /// HTTP status class the caller should map this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidInput(_) => 400,
            Self::Store(_) => 500,
        }
    }

    /// Whether this is the terminal not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the same request may succeed if repeated later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Root entity absent
    NotFound = 0,
    /// Malformed caller input
    InvalidInput = 1,
    /// Store unreachable, timed out or replied with an error
    Transient = 2,
    /// Field could not be parsed. Only [`DecodeError`] carries this category;
    /// decode failures are absorbed and never reach a [`PaddockError`].
    Decode = 3,
}

impl ErrorCategory {
    /// HTTP status code for this category, `None` for [`ErrorCategory::Decode`]
    /// which is never reported to a caller.
    pub fn status_code(self) -> Option<u16> {
        match self {
            ErrorCategory::NotFound => Some(404),
            ErrorCategory::InvalidInput => Some(400),
            ErrorCategory::Transient => Some(500),
            ErrorCategory::Decode => None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::NotFound => write!(f, "NotFound"),
            ErrorCategory::InvalidInput => write!(f, "InvalidInput"),
            ErrorCategory::Transient => write!(f, "Transient"),
            ErrorCategory::Decode => write!(f, "Decode"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the service cannot answer anything
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
