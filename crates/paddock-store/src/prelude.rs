//! Convenience re-exports for common types

pub use crate::command::{Command, FieldMap, Reply};
pub use crate::config::StoreConfig;
pub use crate::memory::MemoryStore;
pub use crate::redis::RedisStore;
pub use crate::traits::{KeyValueStore, KeyValueStoreExt};
