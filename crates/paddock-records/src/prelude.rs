//! Convenience re-exports

pub use crate::decode::{Decoded, decode_record, decode_scalar, parse_boolean};
pub use crate::key::{EntityKey, RelationKey, validate_id};
pub use crate::kind::EntityKind;
pub use crate::record::Record;
pub use crate::schema::{FieldSchema, FieldType};
pub use crate::value::FieldValue;
