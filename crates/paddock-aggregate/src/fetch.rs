//! Batch fetcher: many records in one round trip

use paddock_errors::StoreResult;
use paddock_records::{EntityKey, Record, decode_record};
use paddock_store::{FieldMap, KeyValueStore, KeyValueStoreExt};
use tracing::{debug, warn};

/// Fetches and decodes records by key.
#[derive(Clone, Copy)]
pub struct BatchFetcher<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> BatchFetcher<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Fetch every key's field-map in one round trip and decode the results.
    ///
    /// Keys whose field-map is absent or empty are left out, so the result
    /// may be shorter than `keys`. The remaining records keep the order of
    /// `keys`. No keys means no round trip.
    ///
    /// # Errors
    ///
    /// Returns the store failure when the round trip itself fails.
    pub async fn fetch_many(&self, keys: &[EntityKey]) -> StoreResult<Vec<Record>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let raw_keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let maps = self.store.get_field_maps(&raw_keys).await?;

        let records: Vec<Record> = keys
            .iter()
            .zip(maps.iter())
            .filter_map(|(key, map)| decode_present(key, map))
            .collect();
        debug!(
            requested = keys.len(),
            found = records.len(),
            "Batch fetch complete"
        );
        Ok(records)
    }

    /// Fetch one record; `None` when absent or empty.
    ///
    /// # Errors
    ///
    /// Returns the store failure when the round trip itself fails.
    pub async fn fetch_one(&self, key: &EntityKey) -> StoreResult<Option<Record>> {
        let map = self.store.get_field_map(&key.to_string()).await?;
        Ok(decode_present(key, &map))
    }
}

/// Decode a fetched field-map, logging anything absorbed along the way.
///
/// Empty maps are absent records.
pub fn decode_present(key: &EntityKey, map: &FieldMap) -> Option<Record> {
    if map.is_empty() {
        return None;
    }
    let decoded = decode_record(key, map);
    for issue in &decoded.issues {
        warn!(
            key = %key,
            field = issue.field().unwrap_or_default(),
            error = %issue,
            "Absorbed malformed field"
        );
    }
    Some(decoded.record)
}
