use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column-level metadata as reported by the schema provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
        }
    }
}

/// One collection: its primary key field and columns in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub primary: String,
    pub columns: Vec<ColumnMeta>,
}

impl CollectionSchema {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, data_type: &str) -> Self {
        self.columns.push(ColumnMeta::new(name, data_type));
        self
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Read-only snapshot of every collection known to the schema provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaOverview {
    collections: BTreeMap<String, CollectionSchema>,
}

impl SchemaOverview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, collection: CollectionSchema) {
        self.collections.insert(name.into(), collection);
    }

    pub fn with(mut self, name: impl Into<String>, collection: CollectionSchema) -> Self {
        self.insert(name, collection);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.get(name)
    }

    pub fn primary(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.primary.as_str())
    }

    pub fn collections(&self) -> impl Iterator<Item = (&String, &CollectionSchema)> {
        self.collections.iter()
    }
}
