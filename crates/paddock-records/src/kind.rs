//! Entity kinds and the fixed hierarchy between them

use std::fmt;
use std::str::FromStr;

use paddock_errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Every kind of record the service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Championship,
    Season,
    Category,
    Stage,
    Regulation,
    RaceTrack,
    User,
    Club,
}

impl EntityKind {
    /// All kinds, in hierarchy order followed by the flat kinds.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Championship,
        EntityKind::Season,
        EntityKind::Category,
        EntityKind::Stage,
        EntityKind::Regulation,
        EntityKind::RaceTrack,
        EntityKind::User,
        EntityKind::Club,
    ];

    /// Key tag, the part before the first `:` of an entity key.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Championship => "championship",
            EntityKind::Season => "season",
            EntityKind::Category => "category",
            EntityKind::Stage => "stage",
            EntityKind::Regulation => "regulation",
            EntityKind::RaceTrack => "race_track",
            EntityKind::User => "user",
            EntityKind::Club => "club",
        }
    }

    /// Plural name, used as the relation suffix of index keys and as the
    /// member name of child arrays in aggregate output.
    pub fn relation(self) -> &'static str {
        match self {
            EntityKind::Championship => "championships",
            EntityKind::Season => "seasons",
            EntityKind::Category => "categories",
            EntityKind::Stage => "stages",
            EntityKind::Regulation => "regulations",
            EntityKind::RaceTrack => "race_tracks",
            EntityKind::User => "users",
            EntityKind::Club => "clubs",
        }
    }

    /// Kinds reachable one level down from this kind.
    pub fn children(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Championship => &[EntityKind::Season],
            EntityKind::Season => &[
                EntityKind::Category,
                EntityKind::Stage,
                EntityKind::Regulation,
            ],
            _ => &[],
        }
    }

    /// Whether `child` is a direct child kind of this kind.
    pub fn has_child(self, child: EntityKind) -> bool {
        self.children().contains(&child)
    }

    /// Integer field that orders collections of this kind, if any.
    pub fn order_field(self) -> Option<&'static str> {
        match self {
            EntityKind::Regulation => Some("order"),
            _ => None,
        }
    }

    /// Kind whose relation name is `relation`.
    pub fn from_relation(relation: &str) -> Option<EntityKind> {
        Self::ALL.into_iter().find(|kind| kind.relation() == relation)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::ALL.iter().map(|k| k.tag()).collect();
                ValidationError::invalid_enum("kind", s, expected.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.tag().parse::<EntityKind>(), Ok(kind));
        }
        assert!("racetrack".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_hierarchy_is_fixed() {
        assert_eq!(EntityKind::Championship.children(), &[EntityKind::Season]);
        assert!(EntityKind::Season.has_child(EntityKind::Regulation));
        assert!(!EntityKind::Season.has_child(EntityKind::Season));
        assert!(EntityKind::RaceTrack.children().is_empty());
        assert!(EntityKind::User.children().is_empty());
    }

    #[test]
    fn test_from_relation() {
        assert_eq!(EntityKind::from_relation("stages"), Some(EntityKind::Stage));
        assert_eq!(EntityKind::from_relation("stage"), None);
    }

    #[test]
    fn test_only_regulations_are_ordered() {
        assert_eq!(EntityKind::Regulation.order_field(), Some("order"));
        assert_eq!(EntityKind::Stage.order_field(), None);
    }
}
