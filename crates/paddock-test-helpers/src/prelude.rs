//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use paddock_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_async, must_some, must_with};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{championship_store, minimal_championship_store, seed_relation};
