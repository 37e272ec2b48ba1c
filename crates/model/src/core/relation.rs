use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One relation edge between two collections.
///
/// The many side holds the foreign key (`many_field`); the one side may
/// expose a reverse alias (`one_field`). For a many-to-any relation
/// `one_collection` is unset and the target varies per row among
/// `one_allowed_collections`, discriminated by `one_collection_field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub many_collection: String,
    pub many_field: String,
    #[serde(default)]
    pub one_collection: Option<String>,
    #[serde(default)]
    pub one_field: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_csv",
        deserialize_with = "deserialize_csv"
    )]
    pub one_allowed_collections: Option<Vec<String>>,
    #[serde(default)]
    pub one_collection_field: Option<String>,
    #[serde(default)]
    pub junction_field: Option<String>,
    /// The reverse alias yields at most one item.
    #[serde(default)]
    pub one_to_one: bool,
}

impl RelationDescriptor {
    /// A many-to-one edge `many_collection.many_field -> one_collection`.
    pub fn m2o(many_collection: &str, many_field: &str, one_collection: &str) -> Self {
        Self {
            many_collection: many_collection.to_string(),
            many_field: many_field.to_string(),
            one_collection: Some(one_collection.to_string()),
            one_field: None,
            one_allowed_collections: None,
            one_collection_field: None,
            junction_field: None,
            one_to_one: false,
        }
    }

    /// A many-to-any edge whose targets are `allowed`.
    pub fn m2a(
        many_collection: &str,
        many_field: &str,
        collection_field: &str,
        allowed: &[&str],
    ) -> Self {
        Self {
            many_collection: many_collection.to_string(),
            many_field: many_field.to_string(),
            one_collection: None,
            one_field: None,
            one_allowed_collections: Some(allowed.iter().map(|c| c.to_string()).collect()),
            one_collection_field: Some(collection_field.to_string()),
            junction_field: None,
            one_to_one: false,
        }
    }

    /// Exposes the edge on the one side under `alias`.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.one_field = Some(alias.to_string());
        self
    }

    pub fn with_junction(mut self, junction_field: &str) -> Self {
        self.junction_field = Some(junction_field.to_string());
        self
    }

    pub fn one_to_one(mut self) -> Self {
        self.one_to_one = true;
        self
    }

    pub fn is_many_side(&self, collection: &str, field: &str) -> bool {
        self.many_collection == collection && self.many_field == field
    }

    pub fn is_one_side(&self, collection: &str, field: &str) -> bool {
        self.one_collection.as_deref() == Some(collection) && self.one_field.as_deref() == Some(field)
    }

    pub fn touches(&self, collection: &str, field: &str) -> bool {
        self.is_many_side(collection, field) || self.is_one_side(collection, field)
    }

    /// Fields this relation occupies on `collection`: the key on the many
    /// side, the alias on the one side, both for a self-reference.
    pub fn fields_on(&self, collection: &str) -> impl Iterator<Item = &str> {
        let many = (self.many_collection == collection).then_some(self.many_field.as_str());
        let one = self
            .one_field
            .as_deref()
            .filter(|_| self.one_collection.as_deref() == Some(collection));
        many.into_iter().chain(one)
    }

    pub fn is_polymorphic(&self) -> bool {
        self.one_allowed_collections.is_some()
    }
}

/// Splits the comma-joined storage format, dropping empty entries.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CsvOrList {
    Csv(String),
    List(Vec<String>),
}

fn deserialize_csv<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<CsvOrList>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        CsvOrList::Csv(s) => split_csv(&s),
        CsvOrList::List(list) => list,
    }))
}

fn serialize_csv<S>(value: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(list) => serializer.serialize_some(&list.join(",")),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allowed_collections_accepts_csv_and_list() {
        let from_csv: RelationDescriptor = serde_json::from_value(json!({
            "many_collection": "pages_sections",
            "many_field": "item",
            "one_allowed_collections": "headings, texts"
        }))
        .unwrap();
        let from_list: RelationDescriptor = serde_json::from_value(json!({
            "many_collection": "pages_sections",
            "many_field": "item",
            "one_allowed_collections": ["headings", "texts"]
        }))
        .unwrap();

        assert_eq!(from_csv.one_allowed_collections, from_list.one_allowed_collections);
        assert!(from_csv.is_polymorphic());
        assert_eq!(
            serde_json::to_value(&from_csv).unwrap()["one_allowed_collections"],
            json!("headings,texts")
        );
    }

    #[test]
    fn test_sides() {
        let rel = RelationDescriptor::m2o("articles", "author", "authors").with_alias("articles");

        assert!(rel.is_many_side("articles", "author"));
        assert!(rel.is_one_side("authors", "articles"));
        assert!(!rel.touches("authors", "author"));
        assert_eq!(rel.fields_on("authors").collect::<Vec<_>>(), vec!["articles"]);
        assert_eq!(rel.fields_on("countries").count(), 0);

        let tree = RelationDescriptor::m2o("categories", "parent", "categories").with_alias("children");
        assert_eq!(
            tree.fields_on("categories").collect::<Vec<_>>(),
            vec!["parent", "children"]
        );
    }
}
