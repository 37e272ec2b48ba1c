use crate::{error::StoreError, store::MetadataStore};
use async_trait::async_trait;
use model::{
    access::permission::{FieldSet, PermissionAction, PermissionRecord},
    core::relation::RelationDescriptor,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A permission row as persisted: the grant plus who it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGrant {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub action: PermissionAction,
    pub collection: String,
    pub fields: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub collection: String,
    pub field: String,
}

/// Metadata store backed by plain vectors, loadable from a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
    #[serde(default)]
    pub permissions: Vec<RoleGrant>,
    #[serde(default)]
    pub fields: Vec<FieldRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(source)?)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::from_json(&source)
    }

    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn grant(
        mut self,
        role: &str,
        action: PermissionAction,
        collection: &str,
        fields: &str,
    ) -> Self {
        self.permissions.push(RoleGrant {
            role: Some(role.to_string()),
            action,
            collection: collection.to_string(),
            fields: FieldSet::parse(fields),
        });
        self
    }

    /// Declares fields that exist in metadata, e.g. alias fields with no column.
    pub fn declare(mut self, collection: &str, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(|field| FieldRow {
            collection: collection.to_string(),
            field: field.to_string(),
        }));
        self
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn relations(&self) -> Result<Vec<RelationDescriptor>, StoreError> {
        Ok(self.relations.clone())
    }

    async fn permissions(
        &self,
        role: Option<&str>,
        action: PermissionAction,
    ) -> Result<Vec<PermissionRecord>, StoreError> {
        let records: Vec<PermissionRecord> = self
            .permissions
            .iter()
            .filter(|grant| grant.role.as_deref() == role && grant.action == action)
            .map(|grant| PermissionRecord {
                collection: grant.collection.clone(),
                fields: grant.fields.clone(),
            })
            .collect();

        debug!(?role, %action, count = records.len(), "Loaded permission rows");
        Ok(records)
    }

    async fn field_names(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .fields
            .iter()
            .filter(|row| row.collection == collection)
            .map(|row| row.field.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_permissions_scoped_to_role_and_action() {
        let store = MemoryStore::new()
            .grant("editor", PermissionAction::Read, "articles", "id,title")
            .grant("editor", PermissionAction::Update, "articles", "title")
            .grant("viewer", PermissionAction::Read, "articles", "*");

        let rows = store
            .permissions(Some("editor"), PermissionAction::Read)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.to_string(), "id,title");

        let public = store.permissions(None, PermissionAction::Read).await.unwrap();
        assert!(public.is_empty());
    }

    #[tokio::test]
    async fn test_load_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "relations": [
                    {{ "many_collection": "articles", "many_field": "author", "one_collection": "authors" }}
                ],
                "permissions": [
                    {{ "role": "editor", "action": "read", "collection": "articles", "fields": "*" }}
                ],
                "fields": [ {{ "collection": "authors", "field": "articles" }} ]
            }}"#
        )
        .unwrap();

        let store = MemoryStore::from_file(file.path()).await.unwrap();
        assert_eq!(store.relations().await.unwrap().len(), 1);
        assert_eq!(store.field_names("authors").await.unwrap(), vec!["articles"]);
        let rows = store
            .permissions(Some("editor"), PermissionAction::Read)
            .await
            .unwrap();
        assert_eq!(rows[0].fields, FieldSet::All);
    }

    #[test]
    fn test_malformed_fixture_is_an_error() {
        let err = MemoryStore::from_json("{ \"relations\": 3 }").unwrap_err();
        assert!(matches!(err, StoreError::Fixture(_)));
    }
}
