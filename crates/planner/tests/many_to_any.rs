//! Polymorphic (m2a) fan-out and `key:scope` selectors.

mod common;

use common::{SECTIONS_READER, build_admin, build_as, query};
use model::query::Query;
use planner::{AnyNode, Ast, Child, ast::field_names, classifier::RelationKind};

fn item_node(ast: &Ast) -> &AnyNode {
    let sections = ast.child("sections").and_then(Child::as_relation).unwrap();
    assert_eq!(sections.kind, RelationKind::O2M);
    assert_eq!(sections.name, "pages_sections");
    sections.children.iter().find_map(Child::as_any).unwrap()
}

#[tokio::test]
async fn test_scoped_selectors_stay_on_their_branch() {
    let ast = build_admin(
        "pages",
        &query(&["slug", "sections.item:headings.title", "sections.item:texts.body"]),
    )
    .await;

    assert_eq!(ast.field_names(), vec!["slug"]);

    let item = item_node(&ast);
    assert_eq!(item.field_key, "item");
    assert_eq!(item.parent_key, "id");
    assert_eq!(item.names, vec!["headings", "texts"]);
    assert_eq!(field_names(&item.children["headings"]), vec!["title"]);
    assert_eq!(field_names(&item.children["texts"]), vec!["body"]);
    assert_eq!(item.related_key["headings"], "id");
}

#[tokio::test]
async fn test_unscoped_targets_default_to_star() {
    let ast = build_admin("pages", &query(&["sections.item:headings.id"])).await;

    let item = item_node(&ast);
    assert_eq!(field_names(&item.children["headings"]), vec!["id"]);
    assert_eq!(field_names(&item.children["texts"]), vec!["id", "body"]);
}

#[tokio::test]
async fn test_unscoped_selectors_apply_to_every_target() {
    let ast = build_admin("pages", &query(&["sections.item.id"])).await;

    let item = item_node(&ast);
    assert_eq!(field_names(&item.children["headings"]), vec!["id"]);
    assert_eq!(field_names(&item.children["texts"]), vec!["id"]);
}

#[tokio::test]
async fn test_invisible_targets_are_left_out() {
    let ast = build_as(SECTIONS_READER, "pages", &query(&["*", "sections.item.*"])).await;

    assert_eq!(ast.field_names(), vec!["id", "slug", "title"]);

    let item = item_node(&ast);
    assert_eq!(item.names, vec!["headings"]);
    assert!(!item.children.contains_key("texts"));
    assert_eq!(field_names(&item.children["headings"]), vec!["id", "title"]);
}

#[tokio::test]
async fn test_deep_is_keyed_per_target() {
    let mut heading_query = Query::new();
    heading_query.sort = Some(vec!["title".to_string()]);

    let mut sections_query = Query::new().with_deep("item:headings", heading_query.clone());
    sections_query.limit = Some(5);

    let request = query(&["sections.item.title"]).with_deep("sections", sections_query);
    let ast = build_admin("pages", &request).await;

    let sections = ast.child("sections").and_then(Child::as_relation).unwrap();
    assert_eq!(sections.query.limit, Some(5));
    assert!(sections.query.deep.is_none());

    let item = item_node(&ast);
    assert_eq!(item.query["headings"], heading_query);
    assert!(item.query["texts"].is_empty());
}

#[tokio::test]
async fn test_serialized_any_node() {
    let ast = build_admin("pages", &query(&["sections.item:texts.body"])).await;
    let value = serde_json::to_value(&ast).unwrap();

    let any = &value["children"][0]["children"][0];
    assert_eq!(any["type"], "m2a");
    assert_eq!(any["names"], serde_json::json!(["headings", "texts"]));
    assert_eq!(any["children"]["texts"][0]["name"], "body");
}
