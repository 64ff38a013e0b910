//! Index resolver: relation membership lookups

use std::collections::HashMap;

use paddock_errors::StoreResult;
use paddock_records::{EntityKey, RelationKey};
use paddock_store::{KeyValueStore, KeyValueStoreExt};
use tracing::debug;

/// Resolves relation indexes into child keys.
///
/// An absent index and an empty index both resolve to no members.
#[derive(Clone, Copy)]
pub struct IndexResolver<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> IndexResolver<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Members of one relation, in store order, as child keys.
    ///
    /// # Errors
    ///
    /// Returns the store failure when the round trip fails.
    pub async fn resolve_set(&self, relation: &RelationKey) -> StoreResult<Vec<EntityKey>> {
        let members = self.store.get_set_members(&relation.to_string()).await?;
        Ok(relation.member_keys(&members))
    }

    /// Members of several relations in one round trip.
    ///
    /// # Errors
    ///
    /// Returns the store failure when the round trip fails.
    pub async fn resolve_many_sets(
        &self,
        relations: &[RelationKey],
    ) -> StoreResult<HashMap<RelationKey, Vec<EntityKey>>> {
        let raw_keys: Vec<String> = relations.iter().map(ToString::to_string).collect();
        let mut members = self.store.get_set_members_many(&raw_keys).await?;

        let resolved: HashMap<RelationKey, Vec<EntityKey>> = relations
            .iter()
            .zip(raw_keys.iter())
            .map(|(relation, raw)| {
                let keys = members
                    .remove(raw)
                    .map(|m| relation.member_keys(&m))
                    .unwrap_or_default();
                (relation.clone(), keys)
            })
            .collect();
        debug!(relations = relations.len(), "Resolved relation indexes");
        Ok(resolved)
    }
}
