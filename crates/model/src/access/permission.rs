use crate::core::relation::split_csv;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Marks "every field of the collection" in a permission row.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    #[default]
    Read,
    Update,
    Delete,
    Comment,
    Explain,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Create => "create",
            PermissionAction::Read => "read",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Comment => "comment",
            PermissionAction::Explain => "explain",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown permission action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for PermissionAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(PermissionAction::Create),
            "read" => Ok(PermissionAction::Read),
            "update" => Ok(PermissionAction::Update),
            "delete" => Ok(PermissionAction::Delete),
            "comment" => Ok(PermissionAction::Comment),
            "explain" => Ok(PermissionAction::Explain),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// The fields a permission row exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    All,
    Only(Vec<String>),
}

impl FieldSet {
    /// Parses the comma-joined storage format; a `*` entry anywhere means `All`.
    pub fn parse(raw: &str) -> Self {
        let fields = split_csv(raw);
        if fields.iter().any(|f| f == WILDCARD) {
            FieldSet::All
        } else {
            FieldSet::Only(fields)
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        match self {
            FieldSet::All => true,
            FieldSet::Only(fields) => fields.iter().any(|f| f == field),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldSet::Only(fields) if fields.is_empty())
    }

    /// Union of two sets, keeping first-seen order.
    pub fn merge(&mut self, other: &FieldSet) {
        match (&mut *self, other) {
            (FieldSet::All, _) => {}
            (_, FieldSet::All) => *self = FieldSet::All,
            (FieldSet::Only(mine), FieldSet::Only(theirs)) => {
                for field in theirs {
                    if !mine.contains(field) {
                        mine.push(field.clone());
                    }
                }
            }
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSet::All => write!(f, "{WILDCARD}"),
            FieldSet::Only(fields) => write!(f, "{}", fields.join(",")),
        }
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| FieldSet::parse(&s)).unwrap_or(FieldSet::Only(Vec::new())))
    }
}

/// One `(collection, fields)` grant for a role and action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub collection: String,
    pub fields: FieldSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_set_parse() {
        assert_eq!(FieldSet::parse("*"), FieldSet::All);
        assert_eq!(FieldSet::parse("id,*"), FieldSet::All);
        assert_eq!(
            FieldSet::parse("id, title,"),
            FieldSet::Only(vec!["id".into(), "title".into()])
        );
        assert!(FieldSet::parse("").is_empty());
    }

    #[test]
    fn test_field_set_merge() {
        let mut set = FieldSet::parse("id,title");
        set.merge(&FieldSet::parse("title,body"));
        assert_eq!(set.to_string(), "id,title,body");

        set.merge(&FieldSet::All);
        assert_eq!(set, FieldSet::All);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("READ".parse::<PermissionAction>(), Ok(PermissionAction::Read));
        assert!("drop".parse::<PermissionAction>().is_err());
        assert_eq!(PermissionAction::default(), PermissionAction::Read);
    }
}
