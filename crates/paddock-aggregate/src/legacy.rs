//! Legacy scalar path: records stored as one JSON string

use paddock_errors::StoreResult;
use paddock_records::{EntityKey, Record, decode_scalar};
use paddock_store::{KeyValueStore, KeyValueStoreExt};
use tracing::{debug, warn};

/// Read `key` as a JSON-encoded scalar, in one round trip.
///
/// Absent keys and values that are not a JSON object are `None`; the latter
/// is logged.
///
/// # Errors
///
/// Returns the store failure when the round trip fails.
pub async fn fetch_scalar(store: &dyn KeyValueStore, key: &EntityKey) -> StoreResult<Option<Record>> {
    let Some(raw) = store.get_scalar(&key.to_string()).await? else {
        return Ok(None);
    };
    match decode_scalar(key, &raw) {
        Ok(record) => {
            debug!(key = %key, "Read record from legacy scalar");
            Ok(Some(record))
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Ignoring malformed legacy scalar");
            Ok(None)
        }
    }
}
