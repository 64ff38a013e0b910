//! Store abstraction consumed by the aggregation layer.

use std::collections::HashMap;

use async_trait::async_trait;
use paddock_errors::{StoreError, StoreResult};

use crate::command::{Command, FieldMap, Reply};

/// Read-only access to a key-value store.
///
/// Implementations must answer every command of a round trip in one network
/// exchange, pair replies with commands by position, and fail the whole round
/// trip when any command fails.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Execute all `commands` in a single round trip.
    async fn round_trip(&self, commands: Vec<Command>) -> StoreResult<Vec<Reply>>;

    /// Enumerate every key starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Liveness check.
    async fn ping(&self) -> StoreResult<()>;
}

/// Typed single-purpose operations built on [`KeyValueStore::round_trip`].
///
/// Each method is exactly one round trip, except the batched ones called with
/// no keys, which return immediately.
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Fields of one hash; empty when absent.
    async fn get_field_map(&self, key: &str) -> StoreResult<FieldMap> {
        let replies = self
            .round_trip(vec![Command::FieldMap(key.to_string())])
            .await?;
        single(replies).and_then(into_field_map)
    }

    /// Fields of many hashes, in input order.
    async fn get_field_maps(&self, keys: &[String]) -> StoreResult<Vec<FieldMap>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let commands = keys.iter().cloned().map(Command::FieldMap).collect();
        let replies = self.round_trip(commands).await?;
        expect_len(&replies, keys.len())?;
        replies.into_iter().map(into_field_map).collect()
    }

    /// Members of one set; empty when absent.
    async fn get_set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        let replies = self
            .round_trip(vec![Command::Members(key.to_string())])
            .await?;
        single(replies).and_then(into_members)
    }

    /// Members of many sets, keyed by set key.
    async fn get_set_members_many(
        &self,
        keys: &[String],
    ) -> StoreResult<HashMap<String, Vec<String>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let commands = keys.iter().cloned().map(Command::Members).collect();
        let replies = self.round_trip(commands).await?;
        expect_len(&replies, keys.len())?;
        keys.iter()
            .cloned()
            .zip(replies)
            .map(|(key, reply)| into_members(reply).map(|members| (key, members)))
            .collect()
    }

    /// A plain string value; `None` when absent.
    async fn get_scalar(&self, key: &str) -> StoreResult<Option<String>> {
        let replies = self
            .round_trip(vec![Command::Scalar(key.to_string())])
            .await?;
        single(replies).and_then(into_scalar)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

/// Check that a round trip answered every command.
pub fn expect_len(replies: &[Reply], expected: usize) -> StoreResult<()> {
    if replies.len() == expected {
        Ok(())
    } else {
        Err(StoreError::protocol(format!(
            "expected {expected} replies, got {}",
            replies.len()
        )))
    }
}

fn single(replies: Vec<Reply>) -> StoreResult<Reply> {
    expect_len(&replies, 1)?;
    replies
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::protocol("missing reply"))
}

/// Unwrap a field-map reply.
pub fn into_field_map(reply: Reply) -> StoreResult<FieldMap> {
    match reply {
        Reply::FieldMap(map) => Ok(map),
        other => Err(mismatch("field-map", &other)),
    }
}

/// Unwrap a members reply.
pub fn into_members(reply: Reply) -> StoreResult<Vec<String>> {
    match reply {
        Reply::Members(members) => Ok(members),
        other => Err(mismatch("members", &other)),
    }
}

/// Unwrap a scalar reply.
pub fn into_scalar(reply: Reply) -> StoreResult<Option<String>> {
    match reply {
        Reply::Scalar(value) => Ok(value),
        other => Err(mismatch("scalar", &other)),
    }
}

fn mismatch(expected: &str, got: &Reply) -> StoreError {
    StoreError::protocol(format!(
        "expected {expected} reply, got {}",
        got.shape()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_unwrapping() {
        let map = FieldMap::from([("a".to_string(), "1".to_string())]);
        assert!(matches!(into_field_map(Reply::FieldMap(map)), Ok(m) if m.len() == 1));
        assert!(into_field_map(Reply::Scalar(None)).is_err());
        assert!(into_members(Reply::FieldMap(FieldMap::new())).is_err());
        assert!(matches!(into_scalar(Reply::Scalar(Some("x".into()))), Ok(Some(v)) if v == "x"));
    }

    #[test]
    fn test_expect_len() {
        assert!(expect_len(&[Reply::Scalar(None)], 1).is_ok());
        assert!(expect_len(&[], 1).is_err());
    }
}
