//! Expansion of `*` and `*.<path>` selectors.

use crate::{catalog::RelationCatalog, permissions::Access, selector::WILDCARD};
use model::access::permission::FieldSet;
use tracing::debug;

const RELATIONAL_WILDCARD: &str = "*.";

/// Replaces wildcard selectors with the concrete fields the caller may see.
///
/// `existing` is every field of the collection, columns first. An empty
/// result means the collection is invisible and the branch is pruned.
pub(crate) fn expand_wildcards(
    catalog: &RelationCatalog,
    access: &Access,
    collection: &str,
    existing: &[String],
    selectors: Vec<String>,
) -> Vec<String> {
    let (allowed, unlimited) = match access.allowed_fields(collection) {
        None => return Vec::new(),
        Some(FieldSet::All) => (existing.to_vec(), true),
        Some(FieldSet::Only(fields)) => (fields.clone(), false),
    };

    if allowed.is_empty() {
        return Vec::new();
    }

    let mut expanded = Vec::with_capacity(selectors.len());

    for selector in selectors {
        if selector == WILDCARD {
            debug!(collection, ?allowed, "Expanding wildcard");
            expanded.extend(allowed.iter().cloned());
            continue;
        }

        // `*.rest` -> `relation.rest` for every relation, plus the plain fields
        if let Some(rest) = selector.strip_prefix(RELATIONAL_WILDCARD) {
            let relational: Vec<String> = if unlimited {
                catalog.relational_fields(collection)
            } else {
                allowed
                    .iter()
                    .filter(|field| catalog.get_relation(collection, field).is_some())
                    .cloned()
                    .collect()
            };

            expanded.extend(relational.iter().map(|field| format!("{field}.{rest}")));
            expanded.extend(
                allowed
                    .iter()
                    .filter(|field| !relational.contains(*field))
                    .cloned(),
            );
            continue;
        }

        expanded.push(selector);
    }

    expanded
}
