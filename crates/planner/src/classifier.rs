use model::core::relation::RelationDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    M2O,
    O2M,
    O2O,
    M2A,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::M2O => "m2o",
            RelationKind::O2M => "o2m",
            RelationKind::O2O => "o2o",
            RelationKind::M2A => "m2a",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decides how a relation reads when traversed from `collection.field`.
pub trait RelationClassifier: Send + Sync {
    /// `None` when the relation cannot be traversed from this side.
    fn classify(
        &self,
        relation: &RelationDescriptor,
        collection: &str,
        field: &str,
    ) -> Option<RelationKind>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRelationClassifier;

impl RelationClassifier for DefaultRelationClassifier {
    fn classify(
        &self,
        relation: &RelationDescriptor,
        collection: &str,
        field: &str,
    ) -> Option<RelationKind> {
        if relation.is_many_side(collection, field) {
            if relation.is_polymorphic() {
                return Some(RelationKind::M2A);
            }
            return Some(RelationKind::M2O);
        }

        if relation.is_one_side(collection, field) {
            if relation.one_to_one {
                return Some(RelationKind::O2O);
            }
            return Some(RelationKind::O2M);
        }

        None
    }
}
