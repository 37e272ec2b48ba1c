//! Entry point: query in, authorization-filtered AST out.

mod context;
mod tree;

use crate::{
    ast::Ast,
    catalog::RelationCatalog,
    classifier::{DefaultRelationClassifier, RelationClassifier},
    error::AstError,
    permissions::Access,
    selector::{Selector, WILDCARD},
};
use connectors::store::MetadataStore;
use context::{BuildContext, guarded};
use model::{
    access::{accountability::Accountability, permission::PermissionAction},
    core::schema::SchemaOverview,
    query::Query,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use tree::TreeBuilder;

/// Per-call knobs for [`build_ast`].
#[derive(Clone)]
pub struct BuildOptions {
    /// `None` or an admin accountability means no permission filtering.
    pub accountability: Option<Accountability>,
    pub action: PermissionAction,
    pub cancel: Option<CancellationToken>,
    /// Reject malformed selectors instead of dropping them.
    pub strict_selectors: bool,
    pub classifier: Arc<dyn RelationClassifier>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            accountability: None,
            action: PermissionAction::Read,
            cancel: None,
            strict_selectors: false,
            classifier: Arc::new(DefaultRelationClassifier),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accountability(mut self, accountability: Accountability) -> Self {
        self.accountability = Some(accountability);
        self
    }

    pub fn with_action(mut self, action: PermissionAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn RelationClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_selectors = true;
        self
    }
}

/// Builds the AST for `query` against `collection`.
///
/// The caller's query is never modified; the returned root carries a copy
/// with `fields` and `deep` removed. Unknown collections, fields and
/// relations, as well as anything the requester may not read, are silently
/// left out of the tree. Only store failures, cancellation and (in strict
/// mode) malformed selectors are errors.
#[instrument(skip_all, fields(collection = %collection, action = %options.action))]
pub async fn build_ast(
    collection: &str,
    query: &Query,
    schema: &SchemaOverview,
    store: &dyn MetadataStore,
    options: BuildOptions,
) -> Result<Ast, AstError> {
    let mut query = query.clone();
    let (fields, deep) = query.take_directives();
    let fields = validate_selectors(
        fields.unwrap_or_else(|| vec![WILDCARD.to_string()]),
        options.strict_selectors,
    )?;

    let cancel = options.cancel.clone().unwrap_or_else(CancellationToken::new);

    let (catalog, access) = guarded(&cancel, async {
        tokio::try_join!(
            RelationCatalog::load(store),
            Access::resolve(store, options.accountability.as_ref(), options.action),
        )
    })
    .await?;

    let ctx = BuildContext {
        schema,
        store,
        catalog,
        access,
        classifier: options.classifier.as_ref(),
        cancel,
    };

    let children = TreeBuilder::new(&ctx)
        .parse_fields(collection, fields, deep)
        .await?;

    debug!(children = children.len(), "AST built");

    Ok(Ast {
        name: collection.to_string(),
        query,
        children,
    })
}

/// Checks every requested selector once, before wildcard expansion and any store read.
///
/// Nested levels only ever see the remainder of selectors that passed here.
fn validate_selectors(fields: Vec<String>, strict: bool) -> Result<Vec<String>, AstError> {
    let mut valid = Vec::with_capacity(fields.len());
    for raw in fields {
        match raw.parse::<Selector>() {
            Ok(_) => valid.push(raw),
            Err(reason) if strict => {
                return Err(AstError::InvalidQuery {
                    selector: raw,
                    reason,
                });
            }
            Err(reason) => debug!(selector = %raw, %reason, "Dropping malformed selector"),
        }
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lenient_validation_drops_malformed() {
        let valid =
            validate_selectors(strings(&["title", "a..b", "*.", "item:x.y"]), false).unwrap();
        assert_eq!(valid, strings(&["title", "item:x.y"]));
    }

    #[test]
    fn test_strict_validation_reports_caller_selector() {
        let err = validate_selectors(strings(&["title", "nope..name"]), true).unwrap_err();
        match err {
            AstError::InvalidQuery { selector, reason } => {
                assert_eq!(selector, "nope..name");
                assert_eq!(reason, SelectorError::EmptySegment);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
