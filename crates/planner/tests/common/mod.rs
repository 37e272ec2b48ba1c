#![allow(dead_code)]

use connectors::memory::MemoryStore;
use model::{
    access::{accountability::Accountability, permission::PermissionAction},
    core::{
        relation::RelationDescriptor,
        schema::{CollectionSchema, SchemaOverview},
    },
    query::Query,
};
use planner::{Ast, BuildOptions, Child, build_ast};

pub const EDITOR: &str = "editor";
pub const SECTIONS_READER: &str = "sections-reader";

/// Blog-shaped schema: articles by authors in countries, comments on
/// articles, and pages built from polymorphic sections.
pub fn schema() -> SchemaOverview {
    SchemaOverview::new()
        .with(
            "articles",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("title", "varchar")
                .column("body", "text")
                .column("status", "varchar")
                .column("author", "integer")
                .column("category", "integer"),
        )
        .with(
            "authors",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("name", "varchar")
                .column("email", "varchar")
                .column("country", "integer"),
        )
        .with(
            "countries",
            CollectionSchema::new("code")
                .column("code", "char")
                .column("name", "varchar"),
        )
        .with(
            "categories",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("name", "varchar"),
        )
        .with(
            "comments",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("article", "integer")
                .column("body", "text"),
        )
        .with(
            "pages",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("slug", "varchar")
                .column("title", "varchar"),
        )
        .with(
            "pages_sections",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("page", "integer")
                .column("item", "varchar")
                .column("collection", "varchar"),
        )
        .with(
            "headings",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("title", "varchar")
                .column("level", "integer"),
        )
        .with(
            "texts",
            CollectionSchema::new("id")
                .column("id", "integer")
                .column("body", "text"),
        )
}

pub fn relations() -> Vec<RelationDescriptor> {
    vec![
        RelationDescriptor::m2o("articles", "author", "authors").with_alias("articles"),
        RelationDescriptor::m2o("articles", "category", "categories"),
        RelationDescriptor::m2o("authors", "country", "countries"),
        RelationDescriptor::m2o("comments", "article", "articles").with_alias("comments"),
        RelationDescriptor::m2o("pages_sections", "page", "pages")
            .with_alias("sections")
            .with_junction("item"),
        RelationDescriptor::m2a("pages_sections", "item", "collection", &["headings", "texts"])
            .with_junction("page"),
    ]
}

pub fn store() -> MemoryStore {
    let mut store = MemoryStore::new()
        // `title` duplicates a column; `notice` is a presentation-only field
        .declare("articles", &["comments", "title", "notice"])
        .declare("authors", &["articles"])
        .declare("pages", &["sections"])
        .grant(EDITOR, PermissionAction::Read, "articles", "id,title,author,comments")
        .grant(EDITOR, PermissionAction::Read, "authors", "id,name,country")
        .grant(EDITOR, PermissionAction::Read, "comments", "*")
        .grant(EDITOR, PermissionAction::Update, "countries", "*")
        .grant(SECTIONS_READER, PermissionAction::Read, "pages", "*")
        .grant(SECTIONS_READER, PermissionAction::Read, "pages_sections", "*")
        .grant(SECTIONS_READER, PermissionAction::Read, "headings", "id,title");
    store.relations = relations();
    store
}

pub fn query(fields: &[&str]) -> Query {
    Query::new().with_fields(fields.iter().copied())
}

pub async fn build_admin(collection: &str, query: &Query) -> Ast {
    build_ast(
        collection,
        query,
        &schema(),
        &store(),
        BuildOptions::new().with_accountability(Accountability::admin()),
    )
    .await
    .expect("admin build")
}

pub async fn build_as(role: &str, collection: &str, query: &Query) -> Ast {
    build_ast(
        collection,
        query,
        &schema(),
        &store(),
        BuildOptions::new().with_accountability(Accountability::role(role)),
    )
    .await
    .expect("role build")
}

/// Every field and relation key in the tree, as `collection.field`.
pub fn selected_paths(collection: &str, children: &[Child]) -> Vec<String> {
    let mut paths = Vec::new();
    for child in children {
        match child {
            Child::Field(node) => paths.push(format!("{collection}.{}", node.name)),
            Child::Relation(node) => {
                paths.push(format!("{collection}.{}", node.field_key));
                paths.extend(selected_paths(&node.name, &node.children));
            }
            Child::Any(node) => {
                paths.push(format!("{collection}.{}", node.field_key));
                for (target, nested) in &node.children {
                    paths.extend(selected_paths(target, nested));
                }
            }
        }
    }
    paths
}
