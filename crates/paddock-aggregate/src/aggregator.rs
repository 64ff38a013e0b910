//! Hierarchical aggregator
//!
//! One explicit composition per hierarchy shape. Round trips per call:
//!
//! | operation                        | round trips                                   |
//! |----------------------------------|-----------------------------------------------|
//! | [`Aggregator::parent_with_children`]    | 2 (1 when the index is empty)          |
//! | [`Aggregator::parent_with_child_types`] | 1 + non-empty child types              |
//! | [`Aggregator::championship_tree`]       | 2 + per season (1 + non-empty child types) |
//! | [`Aggregator::fetch_one`]               | 1, plus 1 for the legacy fallback      |
//! | [`Aggregator::list`]                    | key scan + 1                           |
//!
//! None of these counts depends on how many members an index holds.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use paddock_errors::{PaddockError, Result, StoreError, ValidationError};
use paddock_records::{EntityKey, EntityKind, Record, RelationKey};
use paddock_store::traits::{expect_len, into_field_map, into_members};
use paddock_store::{Command, KeyValueStore};
use tracing::{debug, info, warn};

use crate::fetch::{BatchFetcher, decode_present};
use crate::index::IndexResolver;
use crate::legacy::fetch_scalar;
use crate::shape::{ChampionshipTree, ParentWithChildren};

/// Entry point for every read the HTTP surface serves.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator").finish_non_exhaustive()
    }
}

impl Aggregator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The store this aggregator reads from
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn fetcher(&self) -> BatchFetcher<'_> {
        BatchFetcher::new(self.store())
    }

    pub fn resolver(&self) -> IndexResolver<'_> {
        IndexResolver::new(self.store())
    }

    /// A record with the children of one relation.
    ///
    /// # Errors
    ///
    /// - [`PaddockError::InvalidInput`] for a malformed id or a relation outside the hierarchy
    /// - [`PaddockError::NotFound`] when the parent is absent, whatever the index holds
    /// - [`PaddockError::Store`] when either round trip fails
    pub async fn parent_with_children(
        &self,
        parent: EntityKind,
        id: &str,
        child: EntityKind,
    ) -> Result<ParentWithChildren> {
        let key = EntityKey::parse_id(parent, id)?;
        check_relation(parent, child)?;

        let (record, mut indexes) = self.parent_and_indexes(&key, &[child]).await?;
        let members = indexes.remove(&child).unwrap_or_default();
        let mut children = self.fetcher().fetch_many(&members).await?;
        order_children(child, &mut children);

        let mut shape = ParentWithChildren::new(record);
        shape.children.insert(child, children);
        Ok(shape)
    }

    /// A record with the children of several relations.
    ///
    /// Resolves the parent and every index in one round trip, then fetches
    /// each non-empty relation concurrently. A failed relation fetch leaves
    /// that relation empty and is logged.
    ///
    /// # Errors
    ///
    /// - [`PaddockError::InvalidInput`] for a malformed id or a relation outside the hierarchy
    /// - [`PaddockError::NotFound`] when the parent is absent
    /// - [`PaddockError::Store`] when the first round trip fails
    pub async fn parent_with_child_types(
        &self,
        parent: EntityKind,
        id: &str,
        children: &[EntityKind],
    ) -> Result<ParentWithChildren> {
        let key = EntityKey::parse_id(parent, id)?;
        for child in children {
            check_relation(parent, *child)?;
        }

        let (record, indexes) = self.parent_and_indexes(&key, children).await?;
        let mut shape = ParentWithChildren::new(record);
        shape.children = self.fetch_relations(&key, indexes).await;
        Ok(shape)
    }

    /// A championship with all seasons, each with categories, stages and
    /// regulations.
    ///
    /// # Errors
    ///
    /// - [`PaddockError::InvalidInput`] for a malformed id
    /// - [`PaddockError::NotFound`] when the championship is absent
    /// - [`PaddockError::Store`] when a mandatory round trip fails
    pub async fn championship_tree(&self, id: &str) -> Result<ChampionshipTree> {
        let key = EntityKey::parse_id(EntityKind::Championship, id)?;
        let (championship, mut indexes) = self
            .parent_and_indexes(&key, &[EntityKind::Season])
            .await?;
        let season_keys = indexes.remove(&EntityKind::Season).unwrap_or_default();
        let seasons = self.fetcher().fetch_many(&season_keys).await?;

        let subtrees = join_all(seasons.into_iter().map(|season| self.season_subtree(season))).await;
        let seasons = subtrees.into_iter().collect::<Result<Vec<_>>>()?;

        info!(
            championship = %key,
            seasons = seasons.len(),
            "Championship tree assembled"
        );
        Ok(ChampionshipTree {
            championship,
            seasons,
        })
    }

    /// One record by kind and id.
    ///
    /// Reads the field-map first and falls back to the legacy scalar form only
    /// when the field-map yields nothing.
    ///
    /// # Errors
    ///
    /// - [`PaddockError::InvalidInput`] for a malformed id
    /// - [`PaddockError::NotFound`] when neither form holds the record
    /// - [`PaddockError::Store`] when a round trip fails
    pub async fn fetch_one(&self, kind: EntityKind, id: &str) -> Result<Record> {
        let key = EntityKey::parse_id(kind, id)?;
        if let Some(record) = self.fetcher().fetch_one(&key).await? {
            return Ok(record);
        }
        debug!(key = %key, "Field-map empty, trying legacy scalar");
        fetch_scalar(self.store(), &key)
            .await?
            .ok_or_else(|| PaddockError::not_found(kind.tag(), id))
    }

    /// Every record of `kind`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`PaddockError::Store`] when the key scan or the fetch fails.
    pub async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let raw_keys = self.store.scan_prefix(&EntityKey::prefix(kind)).await?;
        let mut keys: Vec<EntityKey> = raw_keys
            .iter()
            .filter_map(|raw| EntityKey::parse(raw))
            .filter(|key| key.kind() == kind)
            .collect();
        keys.sort();
        keys.dedup();

        let mut records = self.fetcher().fetch_many(&keys).await?;
        order_children(kind, &mut records);
        debug!(kind = %kind, keys = keys.len(), records = records.len(), "Listed records");
        Ok(records)
    }

    /// Round trip 1 of every composition: the parent's field-map and the
    /// requested relation indexes together.
    async fn parent_and_indexes(
        &self,
        key: &EntityKey,
        children: &[EntityKind],
    ) -> Result<(Record, BTreeMap<EntityKind, Vec<EntityKey>>)> {
        let relations: Vec<RelationKey> = children.iter().map(|c| key.relation(*c)).collect();
        let mut commands = Vec::with_capacity(relations.len().saturating_add(1));
        commands.push(Command::FieldMap(key.to_string()));
        commands.extend(relations.iter().map(|r| Command::Members(r.to_string())));

        let replies = self.store.round_trip(commands).await?;
        expect_len(&replies, relations.len().saturating_add(1))?;
        let mut replies = replies.into_iter();
        let parent_map = replies
            .next()
            .ok_or_else(|| StoreError::protocol("missing parent reply"))
            .and_then(into_field_map)?;

        let Some(record) = decode_present(key, &parent_map) else {
            debug!(key = %key, "Parent not found");
            return Err(PaddockError::not_found(key.kind().tag(), key.id()));
        };

        let mut indexes = BTreeMap::new();
        for (relation, reply) in relations.iter().zip(replies) {
            let members = into_members(reply)?;
            indexes.insert(relation.child(), relation.member_keys(&members));
        }
        Ok((record, indexes))
    }

    /// Children of one season whose record is already in hand: one round trip
    /// for the indexes, then one per non-empty relation.
    async fn season_subtree(&self, season: Record) -> Result<ParentWithChildren> {
        let key = season.key().clone();
        let relations: Vec<RelationKey> = EntityKind::Season
            .children()
            .iter()
            .map(|c| key.relation(*c))
            .collect();
        let resolved = self.resolver().resolve_many_sets(&relations).await?;
        let indexes = resolved
            .into_iter()
            .map(|(relation, members)| (relation.child(), members))
            .collect();

        let mut shape = ParentWithChildren::new(season);
        shape.children = self.fetch_relations(&key, indexes).await;
        Ok(shape)
    }

    /// Fetch each relation's members concurrently. Empty relations cost no
    /// round trip; failed ones degrade to empty.
    async fn fetch_relations(
        &self,
        parent: &EntityKey,
        indexes: BTreeMap<EntityKind, Vec<EntityKey>>,
    ) -> BTreeMap<EntityKind, Vec<Record>> {
        let fetches = indexes.into_iter().map(|(kind, members)| async move {
            if members.is_empty() {
                return (kind, Vec::new());
            }
            match self.fetcher().fetch_many(&members).await {
                Ok(mut records) => {
                    order_children(kind, &mut records);
                    (kind, records)
                }
                Err(e) => {
                    warn!(
                        parent = %parent,
                        relation = kind.relation(),
                        error = %e,
                        "Child fetch failed, returning empty relation"
                    );
                    (kind, Vec::new())
                }
            }
        });
        join_all(fetches).await.into_iter().collect()
    }
}

fn check_relation(parent: EntityKind, child: EntityKind) -> std::result::Result<(), ValidationError> {
    if parent.has_child(child) {
        return Ok(());
    }
    let expected: Vec<&str> = parent.children().iter().map(|k| k.relation()).collect();
    Err(ValidationError::invalid_enum(
        "relation",
        child.relation(),
        if expected.is_empty() {
            "none".to_string()
        } else {
            expected.join(", ")
        },
    ))
}

/// Stable ascending sort by the kind's order field, missing as 0.
pub fn order_children(kind: EntityKind, records: &mut [Record]) {
    if let Some(field) = kind.order_field() {
        records.sort_by_key(|r| r.integer(field).unwrap_or(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_records::FieldValue;
    use paddock_store::MemoryStore;
    use paddock_test_helpers::must;
    use tracing_test::traced_test;

    fn regulation(id: &str, order: Option<i64>) -> Record {
        let mut record = Record::new(EntityKey::new(EntityKind::Regulation, id));
        if let Some(order) = order {
            record.insert("order", FieldValue::Integer(order));
        }
        record
    }

    #[test]
    fn test_regulations_sort_missing_order_first() {
        let mut records = vec![
            regulation("a", Some(3)),
            regulation("b", Some(1)),
            regulation("c", None),
            regulation("d", Some(2)),
        ];
        order_children(EntityKind::Regulation, &mut records);
        let ids: Vec<&str> = records.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut records = vec![
            regulation("x", Some(1)),
            regulation("y", None),
            regulation("z", Some(1)),
            regulation("w", Some(0)),
        ];
        order_children(EntityKind::Regulation, &mut records);
        let ids: Vec<&str> = records.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["y", "w", "x", "z"]);
    }

    #[test]
    fn test_unordered_kinds_keep_resolution_order() {
        let mut records = vec![
            Record::new(EntityKey::new(EntityKind::Stage, "T2")),
            Record::new(EntityKey::new(EntityKind::Stage, "T1")),
        ];
        order_children(EntityKind::Stage, &mut records);
        assert_eq!(records[0].id(), "T2");
    }

    #[test]
    fn test_check_relation() {
        assert!(check_relation(EntityKind::Season, EntityKind::Stage).is_ok());
        assert!(check_relation(EntityKind::Season, EntityKind::User).is_err());
        assert!(check_relation(EntityKind::RaceTrack, EntityKind::Stage).is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_child_fetch_degrades_and_logs() {
        let store = Arc::new(MemoryStore::new());
        store.insert_hash("season:S1", [("name", "2024")]);
        store.insert_set("season:S1:stages", ["T1"]);
        store.insert_set("season:S1:regulations", ["R1"]);
        store.insert_hash("stage:T1", [("name", "Round 1")]);
        store.insert_hash("regulation:R1", [("title", "Tyres")]);
        store.fail_key("stage:T1");

        let aggregator = Aggregator::new(store.clone());
        let shape = must(
            aggregator
                .parent_with_child_types(
                    EntityKind::Season,
                    "S1",
                    &[EntityKind::Stage, EntityKind::Regulation],
                )
                .await,
        );

        assert!(shape.children(EntityKind::Stage).is_empty());
        assert_eq!(shape.children(EntityKind::Regulation).len(), 1);
        assert_eq!(store.round_trips(), 3);
        assert!(logs_contain("Child fetch failed, returning empty relation"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_field_is_logged_with_key() {
        let store = Arc::new(MemoryStore::new());
        store.insert_hash("season:S1", [("name", "2024"), ("pilots", "{oops")]);

        let aggregator = Aggregator::new(store);
        let shape = must(
            aggregator
                .parent_with_children(EntityKind::Season, "S1", EntityKind::Stage)
                .await,
        );

        assert_eq!(
            shape.parent.get("pilots"),
            Some(&FieldValue::Document(serde_json::json!([])))
        );
        assert!(logs_contain("Absorbed malformed field"));
        assert!(logs_contain("season:S1"));
    }
}
