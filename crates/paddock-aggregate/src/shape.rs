//! Aggregate result shapes

use std::collections::BTreeMap;

use paddock_records::{EntityKind, Record};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A record with one or more child collections.
///
/// Serializes as the parent object with one array member per relation, e.g.
/// `{"id": "S1", "name": "...", "stages": [...]}`. A stored parent field of
/// the same name as a relation is shadowed by the relation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentWithChildren {
    pub parent: Record,
    pub children: BTreeMap<EntityKind, Vec<Record>>,
}

impl ParentWithChildren {
    pub fn new(parent: Record) -> Self {
        Self {
            parent,
            children: BTreeMap::new(),
        }
    }

    /// Children of `kind`; empty when the relation was not requested or had no members.
    pub fn children(&self, kind: EntityKind) -> &[Record] {
        self.children.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    fn relation_names(&self) -> Vec<&'static str> {
        self.children.keys().map(|kind| kind.relation()).collect()
    }
}

impl Serialize for ParentWithChildren {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.parent
            .serialize_fields(&mut map, &self.relation_names())?;
        for (kind, records) in &self.children {
            map.serialize_entry(kind.relation(), records)?;
        }
        map.end()
    }
}

/// A championship with every season and each season's children.
#[derive(Debug, Clone, PartialEq)]
pub struct ChampionshipTree {
    pub championship: Record,
    pub seasons: Vec<ParentWithChildren>,
}

impl ChampionshipTree {
    /// Season subtree for `season_id`.
    pub fn season(&self, season_id: &str) -> Option<&ParentWithChildren> {
        self.seasons.iter().find(|s| s.parent.id() == season_id)
    }
}

impl Serialize for ChampionshipTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let seasons = EntityKind::Season.relation();
        let mut map = serializer.serialize_map(None)?;
        self.championship.serialize_fields(&mut map, &[seasons])?;
        map.serialize_entry(seasons, &self.seasons)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_records::{EntityKey, FieldValue};
    use serde_json::json;

    fn record(kind: EntityKind, id: &str, name: &str) -> Record {
        let mut record = Record::new(EntityKey::new(kind, id));
        record.insert("name", FieldValue::Text(name.to_string()));
        record
    }

    #[test]
    fn test_parent_with_children_flattens() -> Result<(), serde_json::Error> {
        let mut parent = record(EntityKind::Season, "S1", "2024");
        parent.insert("stages", FieldValue::Text("stale".to_string()));
        let mut shape = ParentWithChildren::new(parent);
        shape
            .children
            .insert(EntityKind::Stage, vec![record(EntityKind::Stage, "T1", "Round 1")]);
        shape.children.insert(EntityKind::Regulation, Vec::new());

        assert_eq!(
            serde_json::to_value(&shape)?,
            json!({
                "id": "S1",
                "name": "2024",
                "stages": [{"id": "T1", "name": "Round 1"}],
                "regulations": []
            })
        );
        assert!(shape.children(EntityKind::Category).is_empty());
        Ok(())
    }

    #[test]
    fn test_tree_nests_seasons() -> Result<(), serde_json::Error> {
        let mut season = ParentWithChildren::new(record(EntityKind::Season, "S2", "2025"));
        season.children.insert(EntityKind::Stage, Vec::new());
        let tree = ChampionshipTree {
            championship: record(EntityKind::Championship, "C1", "Karting Cup"),
            seasons: vec![season],
        };

        assert_eq!(
            serde_json::to_value(&tree)?,
            json!({
                "id": "C1",
                "name": "Karting Cup",
                "seasons": [{"id": "S2", "name": "2025", "stages": []}]
            })
        );
        assert!(tree.season("S2").is_some());
        assert!(tree.season("S1").is_none());
        Ok(())
    }
}
