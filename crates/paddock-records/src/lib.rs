//! Data model and record decoder for Paddock
//!
//! Records live in the store as flat string field-maps under `{tag}:{id}`
//! keys, and parent/child relations as sets under `{parent}:{relation}` keys.
//! This crate names those keys ([`EntityKey`], [`RelationKey`]), knows which
//! columns of each [`EntityKind`] are typed ([`FieldSchema`]), and decodes a
//! field-map into a [`Record`].
//!
//! # Example
//!
//! ```
//! use paddock_records::prelude::*;
//! use paddock_store::FieldMap;
//!
//! let key = EntityKey::new(EntityKind::Regulation, "R1");
//! let map = FieldMap::from([
//!     ("title".to_string(), "Tyres".to_string()),
//!     ("order".to_string(), "2".to_string()),
//!     ("attachments".to_string(), "not json".to_string()),
//! ]);
//!
//! let decoded = decode_record(&key, &map);
//! assert_eq!(decoded.record.integer("order"), Some(2));
//! assert_eq!(decoded.issues.len(), 1);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod decode;
pub mod key;
pub mod kind;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod value;

pub use decode::{Decoded, decode_record, decode_scalar};
pub use key::{EntityKey, MAX_ID_LEN, RelationKey, validate_id};
pub use kind::EntityKind;
pub use record::Record;
pub use schema::{FieldSchema, FieldType};
pub use value::FieldValue;
