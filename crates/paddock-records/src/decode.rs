//! Record decoder
//!
//! Turns one stored field-map into a typed [`Record`]. Decoding is pure: it
//! never touches the store and never logs. Recoverable problems are returned
//! next to the record in [`Decoded::issues`] so the caller can log them with
//! the key in scope.
//!
//! Failure policy per column type:
//!
//! | type      | malformed value                            | absent / blank        |
//! |-----------|--------------------------------------------|-----------------------|
//! | integer   | issue recorded, field omitted              | field omitted         |
//! | timestamp | issue recorded, field omitted              | field omitted         |
//! | document  | issue recorded, `[]` (`null` for classification) | `[]` / `null`   |
//! | boolean   | `false`                                    | `false`               |
//! | text      | passed through                             | field omitted         |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use paddock_errors::DecodeError;
use paddock_store::FieldMap;
use serde_json::Value;

use crate::key::EntityKey;
use crate::record::Record;
use crate::schema::{CLASSIFICATION, FieldSchema, FieldType};
use crate::value::FieldValue;

/// A decoded record plus the field problems absorbed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub record: Record,
    pub issues: Vec<DecodeError>,
}

/// Decode the field-map stored at `key`.
///
/// Never fails: a malformed column only affects that column and is reported
/// in [`Decoded::issues`]. See the module docs for the per-type policy.
pub fn decode_record(key: &EntityKey, map: &FieldMap) -> Decoded {
    let schema = FieldSchema::for_kind(key.kind());
    let mut record = Record::new(key.clone());
    let mut issues = Vec::new();

    let mut names: Vec<&String> = map.keys().collect();
    names.sort();

    for name in names {
        let Some(raw) = map.get(name) else {
            continue;
        };
        let value = match schema.field_type(name) {
            FieldType::Integer => match parse_integer(name, raw) {
                Ok(Some(v)) => FieldValue::Integer(v),
                Ok(None) => continue,
                Err(e) => {
                    issues.push(e);
                    continue;
                }
            },
            FieldType::Timestamp => match parse_timestamp(name, raw) {
                Ok(Some(ts)) => FieldValue::Timestamp(ts),
                Ok(None) => continue,
                Err(e) => {
                    issues.push(e);
                    continue;
                }
            },
            FieldType::Document => match parse_document(name, raw) {
                Ok(Some(doc)) => FieldValue::Document(doc),
                Ok(None) => missing_document(name),
                Err(e) => {
                    issues.push(e);
                    missing_document(name)
                }
            },
            FieldType::Boolean => FieldValue::Boolean(parse_boolean(Some(raw))),
            FieldType::Text => FieldValue::Text(raw.clone()),
        };
        record.insert(name.clone(), value);
    }

    for name in schema.documents {
        if !record.contains(name) {
            record.insert(*name, missing_document(name));
        }
    }
    for name in schema.booleans {
        if !record.contains(name) {
            record.insert(*name, FieldValue::Boolean(false));
        }
    }

    Decoded { record, issues }
}

/// Decode a record stored in the legacy form: one JSON object as a plain
/// string value.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidScalar`] when `raw` is not a JSON object.
pub fn decode_scalar(key: &EntityKey, raw: &str) -> Result<Record, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidScalar {
        key: key.to_string(),
        reason,
    };
    let value: Value = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(invalid("expected a JSON object".to_string()));
    };

    let mut record = Record::new(key.clone());
    for (name, value) in object {
        record.insert(name, FieldValue::from(value));
    }
    Ok(record)
}

/// `"true"` and `"1"` are true; anything else, including absence, is false.
pub fn parse_boolean(raw: Option<&str>) -> bool {
    matches!(raw, Some("true" | "1"))
}

/// Base-10 integer column. Blank means absent.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidInteger`] for any other non-integer text.
pub fn parse_integer(field: &str, raw: &str) -> Result<Option<i64>, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_parse| DecodeError::invalid_integer(field, raw))
}

/// Timestamp column in RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` or Unix
/// epoch milliseconds. Naive forms are read as UTC. Blank means absent.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidTimestamp`] when no format matches.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<Option<DateTime<Utc>>, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }
    if let Ok(millis) = trimmed.parse::<i64>() {
        if let Some(ts) = DateTime::from_timestamp_millis(millis) {
            return Ok(Some(ts));
        }
    }
    Err(DecodeError::invalid_timestamp(field, raw))
}

/// JSON document column. Blank means absent.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidDocument`] when `raw` is not valid JSON.
pub fn parse_document(field: &str, raw: &str) -> Result<Option<Value>, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| DecodeError::invalid_document(field, e.to_string()))
}

/// Value used for an absent or unparsable document column.
pub fn missing_document(field: &str) -> FieldValue {
    if field == CLASSIFICATION {
        FieldValue::Null
    } else {
        FieldValue::Document(Value::Array(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::EntityKind;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn must<T, E: std::fmt::Debug>(r: Result<T, E>) -> T {
        match r {
            Ok(v) => v,
            Err(e) => panic!("unexpected Err: {e:?}"),
        }
    }

    #[test]
    fn test_decodes_every_type_class() {
        let key = EntityKey::new(EntityKind::Season, "S1");
        let decoded = decode_record(
            &key,
            &map(&[
                ("name", "2024 Season"),
                ("year", "2024"),
                ("start_date", "2024-03-01"),
                ("created_at", "2024-01-05T10:00:00+02:00"),
                ("sponsors", r#"[{"name":"Acme"}]"#),
                ("classification", r#"{"P1": 120}"#),
                ("active", "1"),
            ]),
        );
        let record = decoded.record;

        assert!(decoded.issues.is_empty());
        assert_eq!(record.text("name"), Some("2024 Season"));
        assert_eq!(record.integer("year"), Some(2024));
        let start = record.get("start_date").and_then(FieldValue::as_timestamp);
        assert_eq!(start.map(|t| (t.year(), t.month(), t.day(), t.hour())), Some((2024, 3, 1, 0)));
        let created = record.get("created_at").and_then(FieldValue::as_timestamp);
        assert_eq!(created.map(Timelike::hour), Some(8));
        assert_eq!(
            record.get("sponsors").and_then(FieldValue::as_document),
            Some(&json!([{"name": "Acme"}]))
        );
        assert_eq!(record.get("active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(record.get("registrations_open"), Some(&FieldValue::Boolean(false)));
        assert_eq!(
            record.get("pilots").and_then(FieldValue::as_document),
            Some(&json!([]))
        );
    }

    #[test]
    fn test_missing_classification_is_null() {
        let key = EntityKey::new(EntityKind::Stage, "T1");
        let record = decode_record(&key, &map(&[("name", "Round 1")])).record;
        assert_eq!(record.get("classification"), Some(&FieldValue::Null));
        assert_eq!(record.get("schedule"), Some(&FieldValue::Document(json!([]))));
    }

    #[test]
    fn test_malformed_document_is_absorbed() {
        let key = EntityKey::new(EntityKind::Stage, "T1");
        let decoded = decode_record(
            &key,
            &map(&[
                ("pilots", "[{broken"),
                ("classification", "nope"),
                ("laps", "12"),
                ("name", "Round 1"),
            ]),
        );
        assert_eq!(decoded.issues.len(), 2);
        assert_eq!(decoded.issues[0].field(), Some("classification"));
        assert_eq!(decoded.record.get("pilots"), Some(&FieldValue::Document(json!([]))));
        assert_eq!(decoded.record.get("classification"), Some(&FieldValue::Null));
        assert_eq!(decoded.record.integer("laps"), Some(12));
        assert_eq!(decoded.record.text("name"), Some("Round 1"));
    }

    #[test]
    fn test_malformed_integer_and_timestamp_are_omitted() {
        let key = EntityKey::new(EntityKind::Season, "S1");
        let decoded = decode_record(
            &key,
            &map(&[
                ("year", "2024a"),
                ("start_date", "soon"),
                ("max_pilots", "30"),
                ("name", "2024"),
            ]),
        );
        assert_eq!(
            decoded.issues,
            vec![
                DecodeError::invalid_timestamp("start_date", "soon"),
                DecodeError::invalid_integer("year", "2024a"),
            ]
        );
        assert!(!decoded.record.contains("year"));
        assert!(!decoded.record.contains("start_date"));
        assert_eq!(decoded.record.integer("max_pilots"), Some(30));
        assert_eq!(decoded.record.text("name"), Some("2024"));
    }

    #[test]
    fn test_blank_integer_and_timestamp_are_absent() {
        let key = EntityKey::new(EntityKind::Stage, "T1");
        let decoded = decode_record(&key, &map(&[("round", ""), ("start_date", " ")]));
        assert!(decoded.issues.is_empty());
        let record = decoded.record;
        assert!(!record.contains("round"));
        assert!(!record.contains("start_date"));
    }

    #[test]
    fn test_timestamp_formats() {
        let parse = |raw: &str| must(parse_timestamp("t", raw)).map(|t| t.timestamp());
        assert_eq!(parse("1970-01-01T00:01:00Z"), Some(60));
        assert_eq!(parse("1970-01-01 00:02:00"), Some(120));
        assert_eq!(parse("1970-01-02"), Some(86_400));
        assert_eq!(parse("5000"), Some(5));
        assert!(parse_timestamp("t", "yesterday").is_err());
        assert!(parse_timestamp("t", "2024-13-01").is_err());
    }

    #[test]
    fn test_boolean_rule() {
        assert!(parse_boolean(Some("true")));
        assert!(parse_boolean(Some("1")));
        assert!(!parse_boolean(Some("false")));
        assert!(!parse_boolean(Some("")));
        assert!(!parse_boolean(Some("TRUE")));
        assert!(!parse_boolean(None));
    }

    #[test]
    fn test_legacy_scalar() {
        let key = EntityKey::new(EntityKind::RaceTrack, "old");
        let record = must(decode_scalar(&key, r#"{"name":"Old Ring","capacity":5000}"#));
        assert_eq!(record.text("name"), Some("Old Ring"));
        assert_eq!(record.integer("capacity"), Some(5000));

        assert!(matches!(
            decode_scalar(&key, "[1,2]"),
            Err(DecodeError::InvalidScalar { .. })
        ));
        assert!(decode_scalar(&key, "{oops").is_err());
    }
}
