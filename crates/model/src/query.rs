//! The caller-supplied item query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative request for items of one collection.
///
/// `fields` and `deep` drive AST construction; everything else (filter, sort,
/// pagination, search, grouping) is carried through untouched to the node
/// the query ends up attached to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Selectors: `title`, `author.name`, `sections.item:headings.title`, `*`, `*.*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Per relation field, the query applied to that relation's children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<BTreeMap<String, Query>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,

    /// Aggregate function name -> fields, e.g. `{"count": ["*"]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<BTreeMap<String, Vec<String>>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_deep(mut self, field: impl Into<String>, query: Query) -> Self {
        self.deep
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), query);
        self
    }

    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Removes the AST directives, leaving only what the execution layer needs.
    pub fn take_directives(&mut self) -> (Option<Vec<String>>, BTreeMap<String, Query>) {
        let fields = self.fields.take();
        let deep = self.deep.take().unwrap_or_default();
        (fields, deep)
    }

    pub fn is_empty(&self) -> bool {
        *self == Query::default()
    }
}
