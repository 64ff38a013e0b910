//! Commands and replies carried by a single round trip.

use std::collections::HashMap;

/// Flat string-keyed representation of one stored record.
pub type FieldMap = HashMap<String, String>;

/// One read command inside a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// All fields of a hash (`HGETALL key`)
    FieldMap(String),
    /// All members of a set (`SMEMBERS key`)
    Members(String),
    /// A plain string value (`GET key`)
    Scalar(String),
}

impl Command {
    /// The key this command reads.
    pub fn key(&self) -> &str {
        match self {
            Command::FieldMap(key) | Command::Members(key) | Command::Scalar(key) => key,
        }
    }

    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::FieldMap(_) => "HGETALL",
            Command::Members(_) => "SMEMBERS",
            Command::Scalar(_) => "GET",
        }
    }

    /// The reply to use when the key holds nothing of the requested shape.
    pub fn empty_reply(&self) -> Reply {
        match self {
            Command::FieldMap(_) => Reply::FieldMap(FieldMap::new()),
            Command::Members(_) => Reply::Members(Vec::new()),
            Command::Scalar(_) => Reply::Scalar(None),
        }
    }
}

/// Reply to one [`Command`], paired with it by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Hash contents; empty when the key is absent
    FieldMap(FieldMap),
    /// Set members in store order; empty when the key is absent
    Members(Vec<String>),
    /// Scalar value; `None` when the key is absent
    Scalar(Option<String>),
}

impl Reply {
    /// Variant name, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Reply::FieldMap(_) => "field-map",
            Reply::Members(_) => "members",
            Reply::Scalar(_) => "scalar",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_key_and_name() {
        let cmd = Command::Members("season:S1:stages".to_string());
        assert_eq!(cmd.key(), "season:S1:stages");
        assert_eq!(cmd.name(), "SMEMBERS");
    }

    #[test]
    fn test_empty_reply_matches_shape() {
        assert_eq!(
            Command::FieldMap("k".into()).empty_reply(),
            Reply::FieldMap(FieldMap::new())
        );
        assert_eq!(Command::Members("k".into()).empty_reply(), Reply::Members(vec![]));
        assert_eq!(Command::Scalar("k".into()).empty_reply(), Reply::Scalar(None));
    }
}
