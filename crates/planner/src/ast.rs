//! The authorization-filtered tree handed to the execution layer.

use crate::classifier::RelationKind;
use model::{core::relation::RelationDescriptor, query::Query};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Root of the tree: the requested collection and its residual query.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub name: String,
    pub query: Query,
    pub children: Vec<Child>,
}

/// A scalar selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldNode {
    pub name: String,
}

/// One m2o, o2m or o2o edge and everything selected through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationNode {
    #[serde(skip)]
    pub kind: RelationKind,
    /// Related collection.
    pub name: String,
    pub field_key: String,
    pub parent_key: String,
    pub related_key: String,
    pub relation: RelationDescriptor,
    pub query: Query,
    pub children: Vec<Child>,
}

/// A many-to-any edge, fanned out into one subtree per visible target collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnyNode {
    pub names: Vec<String>,
    pub children: BTreeMap<String, Vec<Child>>,
    pub query: BTreeMap<String, Query>,
    pub related_key: BTreeMap<String, String>,
    pub parent_key: String,
    pub field_key: String,
    pub relation: RelationDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Field(FieldNode),
    Relation(RelationNode),
    Any(AnyNode),
}

impl Child {
    pub fn field(name: impl Into<String>) -> Self {
        Child::Field(FieldNode { name: name.into() })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Child::Field(_) => "field",
            Child::Relation(node) => node.kind.as_str(),
            Child::Any(_) => RelationKind::M2A.as_str(),
        }
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            Child::Field(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationNode> {
        match self {
            Child::Relation(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_any(&self) -> Option<&AnyNode> {
        match self {
            Child::Any(node) => Some(node),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    node: &'a T,
}

impl Serialize for Child {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.type_name();
        match self {
            Child::Field(node) => Tagged { kind, node }.serialize(serializer),
            Child::Relation(node) => Tagged { kind, node }.serialize(serializer),
            Child::Any(node) => Tagged { kind, node }.serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct RootView<'a> {
    name: &'a str,
    query: &'a Query,
    children: &'a [Child],
}

impl Serialize for Ast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = RootView {
            name: &self.name,
            query: &self.query,
            children: &self.children,
        };
        Tagged { kind: "root", node: &node }.serialize(serializer)
    }
}

impl Ast {
    /// Stable digest of the tree; equal for structurally identical builds.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let serialized = serde_json::to_string(self)?;
        Ok(format!("{:x}", md5::compute(serialized)))
    }

    /// Names of the top-level field nodes, in order.
    pub fn field_names(&self) -> Vec<&str> {
        field_names(&self.children)
    }

    /// First top-level relation or m2a node keyed by `field_key`.
    pub fn child(&self, field_key: &str) -> Option<&Child> {
        find_child(&self.children, field_key)
    }
}

pub fn field_names(children: &[Child]) -> Vec<&str> {
    children
        .iter()
        .filter_map(Child::as_field)
        .map(|node| node.name.as_str())
        .collect()
}

pub fn find_child<'a>(children: &'a [Child], field_key: &str) -> Option<&'a Child> {
    children.iter().find(|child| match child {
        Child::Relation(node) => node.field_key == field_key,
        Child::Any(node) => node.field_key == field_key,
        Child::Field(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Ast {
        Ast {
            name: "articles".into(),
            query: Query::new(),
            children: vec![
                Child::field("title"),
                Child::Relation(RelationNode {
                    kind: RelationKind::M2O,
                    name: "authors".into(),
                    field_key: "author".into(),
                    parent_key: "id".into(),
                    related_key: "id".into(),
                    relation: RelationDescriptor::m2o("articles", "author", "authors"),
                    query: Query::new(),
                    children: vec![Child::field("name")],
                }),
            ],
        }
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["type"], json!("root"));
        assert_eq!(value["children"][0], json!({ "type": "field", "name": "title" }));
        assert_eq!(value["children"][1]["type"], json!("m2o"));
        assert_eq!(value["children"][1]["field_key"], json!("author"));
        assert_eq!(value["children"][1]["children"][0]["name"], json!("name"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(
            sample().fingerprint().unwrap(),
            sample().fingerprint().unwrap()
        );

        let mut other = sample();
        other.children.pop();
        assert_ne!(
            sample().fingerprint().unwrap(),
            other.fingerprint().unwrap()
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let ast = sample();
        assert_eq!(ast.field_names(), vec!["title"]);
        assert!(ast.child("author").and_then(Child::as_relation).is_some());
        assert!(ast.child("title").is_none());
    }
}
