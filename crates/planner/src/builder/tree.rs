use super::context::{BuildContext, guarded};
use crate::{
    ast::{AnyNode, Child, FieldNode, RelationNode},
    classifier::RelationKind,
    error::AstError,
    selector::{NestedSelection, RelationalStructure, Selector},
    wildcard::expand_wildcards,
};
use connectors::system::system_field_names;
use futures::future::BoxFuture;
use model::{core::relation::RelationDescriptor, query::Query};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Why a selector did not make it into the tree.
///
/// Never surfaced to the caller: a denied field and a missing field must
/// look the same from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Omission {
    UnknownField,
    FieldDenied,
    UnknownRelation,
    UntraversableRelation,
    UnknownCollection,
    CollectionDenied,
    /// `key:scope` on a relation that is not many-to-any.
    ScopeNotPolymorphic,
}

fn omit(collection: &str, field: &str, reason: Omission) {
    trace!(collection, field, ?reason, "Selector omitted");
}

/// Splits a `deep` entry into the node's own query and the `deep` for its children.
fn split_deep(entry: Option<&Query>) -> (Query, BTreeMap<String, Query>) {
    let mut query = entry.cloned().unwrap_or_default();
    let nested = query.deep.take().unwrap_or_default();
    (query, nested)
}

pub(crate) struct TreeBuilder<'c, 'a> {
    ctx: &'c BuildContext<'a>,
}

impl<'c, 'a> TreeBuilder<'c, 'a> {
    pub fn new(ctx: &'c BuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Children of one nesting level: field nodes first, then relation nodes.
    pub fn parse_fields<'s>(
        &'s self,
        collection: &'s str,
        selectors: Vec<String>,
        deep: BTreeMap<String, Query>,
    ) -> BoxFuture<'s, Result<Vec<Child>, AstError>> {
        Box::pin(async move {
            if selectors.is_empty() {
                return Ok(Vec::new());
            }

            let ctx = self.ctx;
            let existing = self.fields_in_collection(collection).await?;
            let selectors =
                expand_wildcards(&ctx.catalog, &ctx.access, collection, &existing, selectors);

            if selectors.is_empty() {
                return Ok(Vec::new());
            }

            let mut children: Vec<Child> = Vec::new();
            let mut structure = RelationalStructure::default();

            for raw in selectors {
                // requested selectors were validated up front; this only
                // guards wildcard expansions
                let selector = match raw.parse::<Selector>() {
                    Ok(selector) => selector,
                    Err(reason) => {
                        debug!(collection, selector = %raw, %reason, "Dropping malformed selector");
                        continue;
                    }
                };

                // a bare reverse alias has no column of its own
                if selector.is_nested() || ctx.catalog.is_alias(collection, &selector.key.name) {
                    structure.push(selector);
                    continue;
                }

                let name = selector.key.name;
                if !existing.contains(&name) {
                    omit(collection, &name, Omission::UnknownField);
                    continue;
                }
                if !ctx.access.field_allowed(collection, &name) {
                    omit(collection, &name, Omission::FieldDenied);
                    continue;
                }
                if field_already_selected(&children, &name) {
                    continue;
                }

                children.push(Child::Field(FieldNode { name }));
            }

            for (field, selection) in structure {
                if let Some(child) = self
                    .relation_child(collection, &field, selection, &deep)
                    .await?
                {
                    children.push(child);
                }
            }

            Ok(children)
        })
    }

    /// Columns first, then declared and system fields not already present.
    async fn fields_in_collection(&self, collection: &str) -> Result<Vec<String>, AstError> {
        let ctx = self.ctx;
        let declared = guarded(&ctx.cancel, ctx.store.field_names(collection)).await?;

        let mut fields: Vec<String> = ctx
            .schema
            .get(collection)
            .map(|schema| schema.column_names().map(str::to_string).collect())
            .unwrap_or_default();

        let system = system_field_names(collection)
            .into_iter()
            .map(str::to_string);

        for field in declared.into_iter().chain(system) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        Ok(fields)
    }

    async fn relation_child(
        &self,
        collection: &str,
        field: &str,
        selection: NestedSelection,
        deep: &BTreeMap<String, Query>,
    ) -> Result<Option<Child>, AstError> {
        let ctx = self.ctx;

        if !ctx.access.field_allowed(collection, field) {
            omit(collection, field, Omission::FieldDenied);
            return Ok(None);
        }

        let Some(relation) = ctx.catalog.get_relation(collection, field) else {
            omit(collection, field, Omission::UnknownRelation);
            return Ok(None);
        };

        let Some(kind) = ctx.classifier.classify(relation, collection, field) else {
            omit(collection, field, Omission::UntraversableRelation);
            return Ok(None);
        };

        let Some(parent_key) = ctx.schema.primary(collection) else {
            omit(collection, field, Omission::UnknownCollection);
            return Ok(None);
        };

        if kind == RelationKind::M2A {
            let node = self
                .any_node(collection, field, relation, parent_key, selection, deep)
                .await?;
            return Ok(Some(Child::Any(node)));
        }

        if !selection.scoped.is_empty() {
            omit(collection, field, Omission::ScopeNotPolymorphic);
            if selection.unscoped.is_empty() {
                return Ok(None);
            }
        }

        let Some(related) = ctx.catalog.related_collection(collection, field) else {
            omit(collection, field, Omission::UnknownCollection);
            return Ok(None);
        };

        if !ctx.access.collection_allowed(related) {
            omit(collection, field, Omission::CollectionDenied);
            return Ok(None);
        }

        let Some(related_key) = ctx.schema.primary(related) else {
            omit(collection, field, Omission::UnknownCollection);
            return Ok(None);
        };

        let (query, nested_deep) = split_deep(deep.get(field));
        let children = self
            .parse_fields(related, selection.unscoped, nested_deep)
            .await?;

        Ok(Some(Child::Relation(RelationNode {
            kind,
            name: related.to_string(),
            field_key: field.to_string(),
            parent_key: parent_key.to_string(),
            related_key: related_key.to_string(),
            relation: relation.clone(),
            query,
            children,
        })))
    }

    /// Fans an m2a field out into one subtree per visible target collection.
    async fn any_node(
        &self,
        collection: &str,
        field: &str,
        relation: &RelationDescriptor,
        parent_key: &str,
        selection: NestedSelection,
        deep: &BTreeMap<String, Query>,
    ) -> Result<AnyNode, AstError> {
        let ctx = self.ctx;
        let mut node = AnyNode {
            names: Vec::new(),
            children: BTreeMap::new(),
            query: BTreeMap::new(),
            related_key: BTreeMap::new(),
            parent_key: parent_key.to_string(),
            field_key: field.to_string(),
            relation: relation.clone(),
        };

        for target in relation.one_allowed_collections.iter().flatten() {
            if !ctx.access.collection_allowed(target) {
                omit(collection, field, Omission::CollectionDenied);
                continue;
            }

            let Some(related_key) = ctx.schema.primary(target) else {
                omit(collection, field, Omission::UnknownCollection);
                continue;
            };

            let (query, nested_deep) = split_deep(deep.get(&format!("{field}:{target}")));
            let children = self
                .parse_fields(target, selection.for_collection(target), nested_deep)
                .await?;

            node.names.push(target.clone());
            node.children.insert(target.clone(), children);
            node.query.insert(target.clone(), query);
            node.related_key
                .insert(target.clone(), related_key.to_string());
        }

        Ok(node)
    }
}

fn field_already_selected(children: &[Child], name: &str) -> bool {
    children
        .iter()
        .filter_map(Child::as_field)
        .any(|node| node.name == name)
}
