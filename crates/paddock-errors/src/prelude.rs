//! Convenience re-exports for common error types

pub use crate::{
    Result, StoreResult,
    common::{ErrorCategory, ErrorSeverity, PaddockError},
    decode::DecodeError,
    store::StoreError,
    validation::ValidationError,
};
