//! Entity keys, relation index keys and identifier validation

use std::collections::HashSet;
use std::fmt;

use paddock_errors::ValidationError;

use crate::kind::EntityKind;

/// Longest identifier accepted from callers, in bytes.
pub const MAX_ID_LEN: usize = 128;

/// Check a caller-supplied identifier.
///
/// Identifiers are non-empty, at most [`MAX_ID_LEN`] bytes, and made of
/// ASCII letters, digits, `-`, `_` and `.`.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first rule broken.
pub fn validate_id(id: &str) -> Result<&str, ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::required("id"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::too_long("id", id.len(), MAX_ID_LEN));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ValidationError::invalid_characters(
            "id",
            format!("'{c}' is not allowed"),
        ));
    }
    Ok(id)
}

/// Address of one record: `{tag}:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    kind: EntityKind,
    id: String,
}

impl EntityKey {
    /// Key for `id` of `kind`. The id is not validated, since store data may
    /// hold ids the HTTP surface would reject.
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Key for a caller-supplied id, rejecting malformed ids.
    ///
    /// # Errors
    ///
    /// Returns the validation failure for `id`.
    pub fn parse_id(kind: EntityKind, id: &str) -> Result<Self, ValidationError> {
        validate_id(id).map(|id| Self::new(kind, id))
    }

    /// Parse a stored `{tag}:{id}` key. Relation keys and unknown tags yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, id) = raw.split_once(':')?;
        if id.is_empty() || id.contains(':') {
            return None;
        }
        let kind = tag.parse().ok()?;
        Some(Self::new(kind, id))
    }

    /// Key of a relation index member of kind `kind`.
    ///
    /// Members are stored either as bare ids (`T1`) or as full keys
    /// (`stage:T1`); both name the same record.
    pub fn from_member(kind: EntityKind, member: &str) -> Self {
        let id = member
            .strip_prefix(kind.tag())
            .and_then(|rest| rest.strip_prefix(':'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(member);
        Self::new(kind, id)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Index key listing this record's children of kind `child`.
    pub fn relation(&self, child: EntityKind) -> RelationKey {
        RelationKey {
            parent: self.clone(),
            child,
        }
    }

    /// Prefix shared by every key of `kind`, for key enumeration.
    pub fn prefix(kind: EntityKind) -> String {
        format!("{}:", kind.tag())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.tag(), self.id)
    }
}

/// Relation index key: `{parent}:{relation}`, e.g. `season:S1:stages`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationKey {
    parent: EntityKey,
    child: EntityKind,
}

impl RelationKey {
    pub fn parent(&self) -> &EntityKey {
        &self.parent
    }

    pub fn child(&self) -> EntityKind {
        self.child
    }

    /// Normalize index members into keys of the child kind, keeping order
    /// and dropping repeats.
    pub fn member_keys<'a>(&self, members: impl IntoIterator<Item = &'a String>) -> Vec<EntityKey> {
        let mut seen = HashSet::new();
        members
            .into_iter()
            .map(|member| EntityKey::from_member(self.child, member))
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.parent, self.child.relation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_parse() {
        let key = EntityKey::new(EntityKind::RaceTrack, "spa");
        assert_eq!(key.to_string(), "race_track:spa");
        assert_eq!(EntityKey::parse("race_track:spa"), Some(key));
        assert_eq!(EntityKey::parse("season:S1:stages"), None);
        assert_eq!(EntityKey::parse("garage:1"), None);
        assert_eq!(EntityKey::parse("season:"), None);
    }

    #[test]
    fn test_relation_key_display() {
        let season = EntityKey::new(EntityKind::Season, "S1");
        assert_eq!(season.relation(EntityKind::Stage).to_string(), "season:S1:stages");
        let champ = EntityKey::new(EntityKind::Championship, "C1");
        assert_eq!(
            champ.relation(EntityKind::Season).to_string(),
            "championship:C1:seasons"
        );
    }

    #[test]
    fn test_member_normalization() {
        assert_eq!(EntityKey::from_member(EntityKind::Stage, "T1").to_string(), "stage:T1");
        assert_eq!(
            EntityKey::from_member(EntityKind::Stage, "stage:T1").to_string(),
            "stage:T1"
        );
        assert_eq!(
            EntityKey::from_member(EntityKind::Stage, "stage:").to_string(),
            "stage:stage:"
        );
    }

    #[test]
    fn test_member_keys_dedupe_mixed_forms() {
        let relation = EntityKey::new(EntityKind::Season, "S1").relation(EntityKind::Stage);
        let members = vec!["T2".to_string(), "stage:T2".to_string(), "T1".to_string()];
        let keys: Vec<String> = relation
            .member_keys(&members)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["stage:T2", "stage:T1"]);
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("S-1_a.b").is_ok());
        assert!(matches!(validate_id(""), Err(ValidationError::Required(_))));
        assert!(matches!(
            validate_id(&"x".repeat(MAX_ID_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_id("a:b"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
        assert!(validate_id("ünï").is_err());
    }
}
