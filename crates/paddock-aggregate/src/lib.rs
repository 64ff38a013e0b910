//! Relational aggregation over a key-value store
//!
//! Rebuilds the championship → season → {category, stage, regulation}
//! hierarchy from flat records and relation index sets. Every operation
//! issues a fixed number of round trips that does not grow with the size of
//! a child collection: all records of one relation are fetched together.
//!
//! Building blocks, leaves first:
//!
//! - [`BatchFetcher`] fetches and decodes many records in one round trip
//! - [`IndexResolver`] resolves relation index sets into child keys
//! - [`legacy::fetch_scalar`] reads records stored as one JSON string
//! - [`Aggregator`] composes them into the query shapes the service serves
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use paddock_aggregate::prelude::*;
//! use paddock_store::MemoryStore;
//!
//! # futures::executor::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! store.insert_hash("season:S1", [("name", "2024")]);
//! store.insert_set("season:S1:stages", ["T1", "T2"]);
//! store.insert_hash("stage:T1", [("name", "Round 1")]);
//! store.insert_hash("stage:T2", [("name", "Round 2")]);
//!
//! let aggregator = Aggregator::new(store.clone());
//! let season = aggregator
//!     .parent_with_children(EntityKind::Season, "S1", EntityKind::Stage)
//!     .await?;
//! assert_eq!(season.children(EntityKind::Stage).len(), 2);
//! assert_eq!(store.round_trips(), 2);
//! # Ok::<(), paddock_errors::PaddockError>(())
//! # }).unwrap();
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregator;
pub mod fetch;
pub mod index;
pub mod legacy;
pub mod prelude;
pub mod shape;

pub use aggregator::{Aggregator, order_children};
pub use fetch::BatchFetcher;
pub use index::IndexResolver;
pub use shape::{ChampionshipTree, ParentWithChildren};
