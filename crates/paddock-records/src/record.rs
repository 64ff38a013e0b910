//! Decoded entity records

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::key::EntityKey;
use crate::kind::EntityKind;
use crate::value::FieldValue;

/// One decoded record, tagged with the key it was read from.
///
/// Serializes as a JSON object holding `id` followed by every field. A stored
/// field named `id` is shadowed by the key's id.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: EntityKey,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Empty record for `key`.
    pub fn new(key: EntityKey) -> Self {
        Self {
            key,
            fields: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn id(&self) -> &str {
        self.key.id()
    }

    pub fn kind(&self) -> EntityKind {
        self.key.kind()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Integer field `name`, if present and typed as an integer.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_integer)
    }

    /// Text field `name`, if present and typed as text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Set field `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write `id` and every field not named in `shadowed` into an open map.
    /// Used by aggregate shapes that flatten a record and append relation
    /// members of their own.
    pub fn serialize_fields<M: SerializeMap>(
        &self,
        map: &mut M,
        shadowed: &[&str],
    ) -> Result<(), M::Error> {
        map.serialize_entry("id", self.id())?;
        for (name, value) in &self.fields {
            if name != "id" && !shadowed.contains(&name.as_str()) {
                map.serialize_entry(name, value)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_fields(&mut map, &[])?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_id_first_and_shadows_stored_id() -> Result<(), serde_json::Error> {
        let mut record = Record::new(EntityKey::new(EntityKind::Club, "k1"));
        record.insert("id", FieldValue::Text("stale".to_string()));
        record.insert("name", FieldValue::Text("Kart Club".to_string()));
        record.insert("members_limit", FieldValue::Integer(40));

        assert_eq!(
            serde_json::to_value(&record)?,
            json!({"id": "k1", "name": "Kart Club", "members_limit": 40})
        );
        let text = serde_json::to_string(&record)?;
        assert!(text.starts_with(r#"{"id":"k1""#));
        Ok(())
    }

    #[test]
    fn test_accessors() {
        let mut record = Record::new(EntityKey::new(EntityKind::Regulation, "R1"));
        assert!(record.is_empty());
        record.insert("order", FieldValue::Integer(2));
        record.insert("title", FieldValue::Text("Fuel".to_string()));
        assert_eq!(record.integer("order"), Some(2));
        assert_eq!(record.integer("title"), None);
        assert_eq!(record.text("title"), Some("Fuel"));
        assert_eq!(record.kind(), EntityKind::Regulation);
        assert_eq!(record.len(), 2);
    }
}
