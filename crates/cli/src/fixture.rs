use connectors::memory::MemoryStore;
use model::core::schema::SchemaOverview;
use serde::Deserialize;

/// Offline input for `build`: a schema plus the metadata rows a store would return.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub schema: SchemaOverview,
    #[serde(flatten)]
    pub store: MemoryStore,
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::store::MetadataStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_fixture_carries_schema_and_rows() {
        let fixture: Fixture = serde_json::from_value(json!({
            "schema": {
                "articles": {
                    "primary": "id",
                    "columns": [
                        { "name": "id", "data_type": "integer", "nullable": false },
                        { "name": "author", "data_type": "integer", "nullable": true }
                    ]
                }
            },
            "relations": [
                { "many_collection": "articles", "many_field": "author", "one_collection": "authors" }
            ],
            "fields": [ { "collection": "articles", "field": "notice" } ]
        }))
        .unwrap();

        assert_eq!(fixture.schema.primary("articles"), Some("id"));
        assert_eq!(fixture.store.relations().await.unwrap().len(), 1);
        assert!(fixture.store.permissions.is_empty());
        assert_eq!(
            fixture.store.field_names("articles").await.unwrap(),
            vec!["notice"]
        );
    }
}
