//! Per-kind field typing
//!
//! Stored records are flat string maps. The schema says which columns hold
//! integers, timestamps, JSON documents or boolean flags; every other column
//! is plain text.

use crate::kind::EntityKind;

/// Timestamp columns present on every kind.
pub const COMMON_TIMESTAMPS: &[&str] = &["created_at", "updated_at"];

/// Document column that decodes to `null`, rather than `[]`, when missing or malformed.
pub const CLASSIFICATION: &str = "classification";

/// Type class of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Timestamp,
    Document,
    Boolean,
    Text,
}

/// Typed columns of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub kind: EntityKind,
    pub integers: &'static [&'static str],
    pub timestamps: &'static [&'static str],
    pub documents: &'static [&'static str],
    pub booleans: &'static [&'static str],
}

static CHAMPIONSHIP: FieldSchema = FieldSchema {
    kind: EntityKind::Championship,
    integers: &[],
    timestamps: &["start_date", "end_date"],
    documents: &["sponsors", "gallery"],
    booleans: &["active", "published"],
};

static SEASON: FieldSchema = FieldSchema {
    kind: EntityKind::Season,
    integers: &["year", "max_pilots"],
    timestamps: &["start_date", "end_date"],
    documents: &["sponsors", "pilots", CLASSIFICATION],
    booleans: &["active", "registrations_open"],
};

static CATEGORY: FieldSchema = FieldSchema {
    kind: EntityKind::Category,
    integers: &["max_pilots", "min_age"],
    timestamps: &[],
    documents: &["pilots", CLASSIFICATION],
    booleans: &["active"],
};

static STAGE: FieldSchema = FieldSchema {
    kind: EntityKind::Stage,
    integers: &["round", "laps"],
    timestamps: &["start_date", "end_date"],
    documents: &["pilots", "schedule", CLASSIFICATION],
    booleans: &["published", "finished"],
};

static REGULATION: FieldSchema = FieldSchema {
    kind: EntityKind::Regulation,
    integers: &["order"],
    timestamps: &[],
    documents: &["attachments"],
    booleans: &["active"],
};

static RACE_TRACK: FieldSchema = FieldSchema {
    kind: EntityKind::RaceTrack,
    integers: &["capacity", "length_m"],
    timestamps: &[],
    documents: &["layouts", "gallery"],
    booleans: &["active"],
};

static USER: FieldSchema = FieldSchema {
    kind: EntityKind::User,
    integers: &[],
    timestamps: &["birth_date", "last_login_at"],
    documents: &["roles"],
    booleans: &["is_admin", "email_verified", "active"],
};

static CLUB: FieldSchema = FieldSchema {
    kind: EntityKind::Club,
    integers: &["members_limit"],
    timestamps: &[],
    documents: &["sponsors", "members"],
    booleans: &["active"],
};

impl FieldSchema {
    /// Schema of `kind`.
    pub fn for_kind(kind: EntityKind) -> &'static FieldSchema {
        match kind {
            EntityKind::Championship => &CHAMPIONSHIP,
            EntityKind::Season => &SEASON,
            EntityKind::Category => &CATEGORY,
            EntityKind::Stage => &STAGE,
            EntityKind::Regulation => &REGULATION,
            EntityKind::RaceTrack => &RACE_TRACK,
            EntityKind::User => &USER,
            EntityKind::Club => &CLUB,
        }
    }

    /// Type class of column `name`.
    pub fn field_type(&self, name: &str) -> FieldType {
        if self.integers.contains(&name) {
            FieldType::Integer
        } else if self.timestamps.contains(&name) || COMMON_TIMESTAMPS.contains(&name) {
            FieldType::Timestamp
        } else if self.documents.contains(&name) {
            FieldType::Document
        } else if self.booleans.contains(&name) {
            FieldType::Boolean
        } else {
            FieldType::Text
        }
    }
}
