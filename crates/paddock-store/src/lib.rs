//! Key-value store access for Paddock
//!
//! The aggregation layer only ever reads, and only through three store
//! primitives: field-map get (`HGETALL`), set membership (`SMEMBERS`) and
//! scalar get (`GET`). This crate exposes them through the
//! [`KeyValueStore`] trait, whose central method [`KeyValueStore::round_trip`]
//! sends any number of those commands in a single network exchange.
//!
//! - [`command`]: the command/reply vocabulary of a round trip
//! - [`traits`]: `KeyValueStore` and the typed `KeyValueStoreExt` helpers
//! - [`config`]: connection settings supplied at construction
//! - [`redis`]: pooled, pipelined RESP2 client
//! - [`memory`]: in-memory store that counts round trips, for tests
//!
//! # Example
//!
//! ```
//! use paddock_store::prelude::*;
//!
//! # async fn example() -> paddock_errors::StoreResult<()> {
//! let store = MemoryStore::new();
//! store.insert_hash("season:S1", [("name", "2024")]);
//! store.insert_set("season:S1:stages", ["T1", "T2"]);
//!
//! let fields = store.get_field_map("season:S1").await?;
//! assert_eq!(fields.get("name").map(String::as_str), Some("2024"));
//! assert_eq!(store.round_trips(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command;
pub mod config;
pub mod memory;
pub mod prelude;
pub mod redis;
pub mod traits;

pub use command::{Command, FieldMap, Reply};
pub use config::StoreConfig;
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use traits::{KeyValueStore, KeyValueStoreExt};
