//! Convenience re-exports

pub use crate::aggregator::Aggregator;
pub use crate::fetch::BatchFetcher;
pub use crate::index::IndexResolver;
pub use crate::shape::{ChampionshipTree, ParentWithChildren};
pub use paddock_records::{EntityKey, EntityKind, Record};
