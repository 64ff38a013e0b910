//! Decoded field values

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One typed field of a decoded record.
///
/// Serializes as the bare value: integers as numbers, timestamps as RFC 3339
/// strings, documents as the parsed JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    Document(Value),
    Text(String),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            FieldValue::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<Value> for FieldValue {
    /// Values of the legacy JSON representation keep their JSON shape.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Document(Value::Number(n)),
            },
            other => FieldValue::Document(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_serializes_untagged() -> Result<(), serde_json::Error> {
        let ts = match Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0) {
            chrono::LocalResult::Single(ts) => ts,
            other => panic!("unexpected {other:?}"),
        };
        let values = vec![
            FieldValue::Null,
            FieldValue::Boolean(true),
            FieldValue::Integer(7),
            FieldValue::Timestamp(ts),
            FieldValue::Document(json!([{"pilot": "P1"}])),
            FieldValue::Text("Spa".to_string()),
        ];
        assert_eq!(
            serde_json::to_value(&values)?,
            json!([null, true, 7, "2024-03-01T12:00:00Z", [{"pilot": "P1"}], "Spa"])
        );
        Ok(())
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(FieldValue::from(json!(5)), FieldValue::Integer(5));
        assert_eq!(FieldValue::from(json!(1.5)), FieldValue::Document(json!(1.5)));
        assert_eq!(FieldValue::from(json!("x")).as_text(), Some("x"));
        assert!(FieldValue::from(json!(null)).is_null());
    }
}
