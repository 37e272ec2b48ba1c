use connectors::{error::StoreError, store::MetadataStore, system::system_relations};
use model::core::relation::RelationDescriptor;
use tracing::debug;

/// Every relation visible to one AST build: persisted rows plus system rows.
///
/// Lookups are linear scans; catalogs hold tens to low hundreds of rows.
#[derive(Debug, Clone, Default)]
pub struct RelationCatalog {
    relations: Vec<RelationDescriptor>,
}

impl RelationCatalog {
    pub fn new(relations: Vec<RelationDescriptor>) -> Self {
        Self { relations }
    }

    pub async fn load(store: &dyn MetadataStore) -> Result<Self, StoreError> {
        let mut relations = store.relations().await?;
        relations.extend(system_relations().iter().cloned());
        debug!(count = relations.len(), "Relation catalog loaded");
        Ok(Self::new(relations))
    }

    /// The relation `collection.field` takes part in, on either side.
    pub fn get_relation(&self, collection: &str, field: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.touches(collection, field))
    }

    /// The collection on the other side of `collection.field`.
    pub fn related_collection(&self, collection: &str, field: &str) -> Option<&str> {
        let relation = self.get_relation(collection, field)?;

        if relation.is_many_side(collection, field) {
            return relation.one_collection.as_deref();
        }

        if relation.is_one_side(collection, field) {
            return Some(relation.many_collection.as_str());
        }

        None
    }

    /// True if `field` is the reverse alias of a relation pointing at `collection`.
    pub fn is_alias(&self, collection: &str, field: &str) -> bool {
        self.relations.iter().any(|r| r.is_one_side(collection, field))
    }

    /// Fields of `collection` that are backed by a relation, first-seen order.
    pub fn relational_fields(&self, collection: &str) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for field in self.relations.iter().flat_map(|r| r.fields_on(collection)) {
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RelationCatalog {
        RelationCatalog::new(vec![
            RelationDescriptor::m2o("articles", "author", "authors").with_alias("articles"),
            RelationDescriptor::m2o("authors", "country", "countries"),
            RelationDescriptor::m2o("categories", "parent", "categories").with_alias("children"),
            RelationDescriptor {
                one_collection: None,
                ..RelationDescriptor::m2o("articles", "legacy_ref", "unused")
            },
        ])
    }

    #[test]
    fn test_get_relation_matches_both_sides() {
        let catalog = catalog();
        assert!(catalog.get_relation("articles", "author").is_some());
        assert!(catalog.get_relation("authors", "articles").is_some());
        assert!(catalog.get_relation("authors", "author").is_none());
    }

    #[test]
    fn test_related_collection() {
        let catalog = catalog();
        assert_eq!(catalog.related_collection("articles", "author"), Some("authors"));
        assert_eq!(catalog.related_collection("authors", "articles"), Some("articles"));
        assert_eq!(catalog.related_collection("articles", "legacy_ref"), None);
        assert_eq!(catalog.related_collection("articles", "title"), None);
    }

    #[test]
    fn test_relational_fields() {
        let catalog = catalog();
        assert_eq!(
            catalog.relational_fields("articles"),
            vec!["author", "legacy_ref"]
        );
        assert_eq!(catalog.relational_fields("authors"), vec!["articles", "country"]);
        assert_eq!(
            catalog.relational_fields("categories"),
            vec!["parent", "children"]
        );
        assert!(catalog.is_alias("categories", "children"));
        assert!(!catalog.is_alias("categories", "parent"));
    }
}
