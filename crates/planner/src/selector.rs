//! Parsing of field selectors.
//!
//! A selector is parsed once, here, into a [`Selector`]; nothing past the
//! classification step sees the raw `key:scope.rest` string again.

use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

pub const WILDCARD: &str = "*";

/// First path segment of a selector, with its optional m2a collection scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub name: String,
    pub scope: Option<String>,
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}:{}", self.name, scope),
            None => write!(f, "{}", self.name),
        }
    }
}

/// `key[:scope][.rest]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub key: FieldKey,
    /// Remaining dot-path, handed to the next nesting level verbatim.
    pub rest: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("empty path segment")]
    EmptySegment,

    #[error("malformed collection scope `{0}`")]
    MalformedScope(String),
}

impl FromStr for Selector {
    type Err = SelectorError;

    /// Validates every segment of the path, not only the one this level consumes.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }

        let (head, rest) = match raw.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (raw, None),
        };

        let key = parse_key(head)?;
        if let Some(rest) = rest {
            for segment in rest.split('.') {
                parse_key(segment)?;
            }
        }

        Ok(Selector {
            key,
            rest: rest.map(str::to_string),
        })
    }
}

/// `name` or `name:scope`.
fn parse_key(segment: &str) -> Result<FieldKey, SelectorError> {
    if segment.is_empty() {
        return Err(SelectorError::EmptySegment);
    }

    match segment.split_once(':') {
        None => Ok(FieldKey {
            name: segment.to_string(),
            scope: None,
        }),
        Some((name, scope)) if name.is_empty() || scope.is_empty() || scope.contains(':') => {
            Err(SelectorError::MalformedScope(segment.to_string()))
        }
        Some((name, scope)) => Ok(FieldKey {
            name: name.to_string(),
            scope: Some(scope.to_string()),
        }),
    }
}

impl Selector {
    pub fn is_nested(&self) -> bool {
        self.rest.is_some() || self.key.scope.is_some()
    }
}

/// Nested selectors collected for one relation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedSelection {
    pub unscoped: Vec<String>,
    pub scoped: BTreeMap<String, Vec<String>>,
}

impl NestedSelection {
    pub fn add(&mut self, scope: Option<String>, rest: Option<String>) {
        let list = match scope {
            Some(scope) => self.scoped.entry(scope).or_default(),
            None => &mut self.unscoped,
        };
        if let Some(rest) = rest {
            list.push(rest);
        }
    }

    /// Selectors for one m2a target: its scoped list, else the unscoped one, else `*`.
    pub fn for_collection(&self, collection: &str) -> Vec<String> {
        self.scoped
            .get(collection)
            .filter(|list| !list.is_empty())
            .or(Some(&self.unscoped).filter(|list| !list.is_empty()))
            .cloned()
            .unwrap_or_else(|| vec![WILDCARD.to_string()])
    }
}

/// Groups selectors by relation key, keeping first-encounter order.
#[derive(Debug, Default)]
pub struct RelationalStructure {
    entries: Vec<(String, NestedSelection)>,
}

impl RelationalStructure {
    pub fn push(&mut self, selector: Selector) {
        let Selector { key, rest } = selector;
        let index = match self.entries.iter().position(|(name, _)| *name == key.name) {
            Some(index) => index,
            None => {
                self.entries.push((key.name, NestedSelection::default()));
                self.entries.len() - 1
            }
        };
        self.entries[index].1.add(key.scope, rest);
    }
}

impl IntoIterator for RelationalStructure {
    type Item = (String, NestedSelection);
    type IntoIter = std::vec::IntoIter<(String, NestedSelection)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
