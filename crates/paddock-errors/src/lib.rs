//! Error taxonomy for Paddock
//!
//! Every failure the aggregation layer can produce falls into one of four
//! classes, and each class has a fixed propagation policy:
//!
//! - [`PaddockError::NotFound`]: a root entity is absent. Terminal, never
//!   retried, surfaced to HTTP clients as 404.
//! - [`DecodeError`]: one field or one sibling record could not be parsed.
//!   Absorbed at the lowest layer (dropped record, empty collection) and
//!   logged; it never reaches a caller as an error.
//! - [`StoreError`]: the store round trip itself failed. Propagated
//!   unchanged as a transient failure (500), never masked as empty data.
//! - [`ValidationError`]: a caller-supplied identifier is malformed.
//!   Rejected before any round trip is issued (400).
//!
//! # Example
//!
//! ```
//! use paddock_errors::prelude::*;
//!
//! fn lookup(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(ValidationError::required("id").into());
//!     }
//!     Err(PaddockError::not_found("season", id))
//! }
//!
//! let err = lookup("S1").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::NotFound);
//! assert_eq!(err.status_code(), 404);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod decode;
pub mod prelude;
pub mod store;
pub mod validation;

pub use common::{ErrorCategory, ErrorSeverity, PaddockError};
pub use decode::DecodeError;
pub use store::StoreError;
pub use validation::ValidationError;

/// A specialized `Result` type for Paddock operations.
pub type Result<T> = std::result::Result<T, PaddockError>;

/// A specialized `Result` type for store round trips.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
