use super::utils::{connect_client, metadata_config};
use crate::{error::StoreError, store::MetadataStore};
use async_trait::async_trait;
use model::{
    access::permission::{FieldSet, PermissionAction, PermissionRecord},
    core::{
        relation::{RelationDescriptor, split_csv},
        schema::{CollectionSchema, ColumnMeta, SchemaOverview},
    },
};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;
use tokio_postgres::{Client, Row};
use tracing::{debug, warn};

const QUERY_RELATIONS_SQL: &str = include_str!("sql/relations.sql");
const QUERY_PERMISSIONS_SQL: &str = include_str!("sql/permissions.sql");
const QUERY_FIELDS_SQL: &str = include_str!("sql/fields.sql");
const QUERY_SCHEMA_COLUMNS_SQL: &str = include_str!("sql/schema_columns.sql");
const QUERY_SCHEMA_PRIMARY_KEYS_SQL: &str = include_str!("sql/schema_primary_keys.sql");

/// Reads relation, permission and field metadata from the `directus_*` tables.
#[derive(Clone)]
pub struct PgMetadataStore {
    client: Arc<RwLock<Client>>,
}

impl PgMetadataStore {
    /// Connects with the `sslmode` of `url`; `search_path` scopes every metadata read.
    pub async fn connect(url: &str, search_path: Option<&str>) -> Result<Self, StoreError> {
        let config = metadata_config(url, search_path)?;
        let client = connect_client(&config).await?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client: Arc::new(RwLock::new(client)),
        }
    }

    /// Introspects the current schema into a [`SchemaOverview`].
    ///
    /// Tables without a primary key are left out; nothing can be related to them.
    pub async fn load_schema(&self) -> Result<SchemaOverview, StoreError> {
        let client = self.client.read().await;
        let column_rows = client.query(QUERY_SCHEMA_COLUMNS_SQL, &[]).await?;
        let key_rows = client.query(QUERY_SCHEMA_PRIMARY_KEYS_SQL, &[]).await?;

        let mut primaries: BTreeMap<String, String> = BTreeMap::new();
        for row in &key_rows {
            let table: String = row.try_get("table_name")?;
            let column: String = row.try_get("column_name")?;
            // composite keys: the first key column identifies the item
            primaries.entry(table).or_insert(column);
        }

        let mut columns: BTreeMap<String, Vec<ColumnMeta>> = BTreeMap::new();
        for row in &column_rows {
            let table: String = row.try_get("table_name")?;
            columns.entry(table).or_default().push(column_from_row(row)?);
        }

        let mut schema = SchemaOverview::new();
        for (table, cols) in columns {
            match primaries.remove(&table) {
                Some(primary) => schema.insert(
                    table,
                    CollectionSchema {
                        primary,
                        columns: cols,
                    },
                ),
                None => warn!(table = %table, "Skipping table without primary key"),
            }
        }

        Ok(schema)
    }
}

fn column_from_row(row: &Row) -> Result<ColumnMeta, StoreError> {
    let default: Option<String> = row.try_get("column_default")?;
    Ok(ColumnMeta {
        name: row.try_get("column_name")?,
        data_type: row.try_get("data_type")?,
        nullable: row.try_get("nullable")?,
        default_value: default.map(serde_json::Value::String),
    })
}

fn relation_from_row(row: &Row) -> Result<RelationDescriptor, StoreError> {
    let many_collection: Option<String> = row.try_get("many_collection")?;
    let many_field: Option<String> = row.try_get("many_field")?;
    let (Some(many_collection), Some(many_field)) = (many_collection, many_field) else {
        return Err(StoreError::MalformedRow(
            "relation row without many_collection/many_field".to_string(),
        ));
    };
    let allowed: Option<String> = row.try_get("one_allowed_collections")?;

    Ok(RelationDescriptor {
        many_collection,
        many_field,
        one_collection: row.try_get("one_collection")?,
        one_field: row.try_get("one_field")?,
        one_allowed_collections: allowed.map(|raw| split_csv(&raw)),
        one_collection_field: row.try_get("one_collection_field")?,
        junction_field: row.try_get("junction_field")?,
        one_to_one: false,
    })
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn relations(&self) -> Result<Vec<RelationDescriptor>, StoreError> {
        let client = self.client.read().await;
        let rows = client.query(QUERY_RELATIONS_SQL, &[]).await?;
        let relations = rows
            .iter()
            .map(relation_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = relations.len(), "Loaded relation rows");
        Ok(relations)
    }

    async fn permissions(
        &self,
        role: Option<&str>,
        action: PermissionAction,
    ) -> Result<Vec<PermissionRecord>, StoreError> {
        let client = self.client.read().await;
        let rows = client
            .query(QUERY_PERMISSIONS_SQL, &[&role, &action.as_str()])
            .await?;

        rows.iter()
            .map(|row| -> Result<PermissionRecord, StoreError> {
                let fields: Option<String> = row.try_get("fields")?;
                Ok(PermissionRecord {
                    collection: row.try_get("collection")?,
                    fields: fields
                        .map(|raw| FieldSet::parse(&raw))
                        .unwrap_or(FieldSet::Only(Vec::new())),
                })
            })
            .collect()
    }

    async fn field_names(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let client = self.client.read().await;
        let rows = client.query(QUERY_FIELDS_SQL, &[&collection]).await?;
        let fields = rows
            .iter()
            .map(|row| row.try_get::<_, String>("field"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fields)
    }
}
