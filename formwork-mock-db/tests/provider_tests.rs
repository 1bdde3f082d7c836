use formwork_mock_db::{MockDataProvider, MockDbModule};
use formwork_runtime::App;
use formwork_types::{DataProvider, FindQuery, SortSpec};
use serde_json::{Value, json};
use std::sync::Arc;

// ── Introspection ────────────────────────────────────────────────

#[tokio::test]
async fn introspect_returns_valid_seeded_schema() {
    let db = MockDataProvider::new();
    let schema = db.introspect().await.unwrap();

    schema.validate().unwrap();
    let names: Vec<&str> = schema.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["users", "posts"]);
}

// ── Pagination ───────────────────────────────────────────────────

#[tokio::test]
async fn first_page_holds_all_records_when_limit_exceeds_total() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().page(1).limit(5))
        .await
        .unwrap();

    let page = result.as_page().unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 5);
}

#[tokio::test]
async fn out_of_range_page_is_valid_but_empty() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().page(2).limit(5))
        .await
        .unwrap();

    let page = result.as_page().unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 5);
}

#[tokio::test]
async fn limit_splits_records_across_pages() {
    let db = MockDataProvider::new();

    let first = db
        .find("users", FindQuery::default().page(1).limit(1))
        .await
        .unwrap();
    let second = db
        .find("users", FindQuery::default().page(2).limit(1))
        .await
        .unwrap();

    assert_eq!(first.records()[0]["id"], 1);
    assert_eq!(second.records()[0]["id"], 2);
    assert_eq!(first.as_page().unwrap().total, 2);
}

#[tokio::test]
async fn unknown_entity_reads_as_empty() {
    let db = MockDataProvider::new();
    let result = db.find("comments", FindQuery::default()).await.unwrap();
    assert_eq!(result.as_page().unwrap().total, 0);
    assert!(result.records().is_empty());
}

// ── Filtering and search ─────────────────────────────────────────

#[tokio::test]
async fn equality_filter_matches_typed_values() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().filter("role", "admin"))
        .await
        .unwrap();

    assert_eq!(result.records().len(), 1);
    assert_eq!(result.records()[0]["name"], "Alice Admin");
}

#[tokio::test]
async fn filter_tolerates_stringified_query_params() {
    // HTTP query params arrive as strings; "1" should match the numeric id
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().filter("id", "1"))
        .await
        .unwrap();
    assert_eq!(result.records().len(), 1);

    let result = db
        .find("users", FindQuery::default().filter("isActive", "true"))
        .await
        .unwrap();
    assert_eq!(result.records().len(), 1);
    assert_eq!(result.records()[0]["name"], "Alice Admin");
}

#[tokio::test]
async fn q_searches_text_fields_case_insensitively() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().q("BUILDER"))
        .await
        .unwrap();

    assert_eq!(result.records().len(), 1);
    assert_eq!(result.records()[0]["name"], "Bob Builder");
}

#[tokio::test]
async fn q_with_no_match_returns_empty_page() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().q("nobody"))
        .await
        .unwrap();
    assert_eq!(result.as_page().unwrap().total, 0);
}

// ── Sorting ──────────────────────────────────────────────────────

#[tokio::test]
async fn sort_descending_by_name() {
    let db = MockDataProvider::new();
    let result = db
        .find("users", FindQuery::default().sort(SortSpec::descending("name")))
        .await
        .unwrap();

    let names: Vec<&str> = result
        .records()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob Builder", "Alice Admin"]);
}

#[tokio::test]
async fn sort_ascending_by_numeric_id() {
    let db = MockDataProvider::new();
    db.create("users", json!({"name": "Cara Clerk", "email": "cara@example.com"}))
        .await
        .unwrap();

    let result = db
        .find("users", FindQuery::default().sort(SortSpec::ascending("id")))
        .await
        .unwrap();
    let ids: Vec<i64> = result.records().iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

// ── CRUD ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_next_id() {
    let db = MockDataProvider::new();
    let record = db
        .create("users", json!({"name": "Cara Clerk", "email": "cara@example.com"}))
        .await
        .unwrap();

    assert_eq!(record["id"], 3);
    assert_eq!(record["name"], "Cara Clerk");

    let page = db.find("users", FindQuery::default()).await.unwrap();
    assert_eq!(page.as_page().unwrap().total, 3);
}

#[tokio::test]
async fn create_ids_do_not_collide_after_delete() {
    let db = MockDataProvider::new();
    db.delete("users", &json!(1)).await.unwrap();
    let record = db
        .create("users", json!({"name": "Cara Clerk", "email": "cara@example.com"}))
        .await
        .unwrap();
    // max(existing) + 1, not row-count + 1: user 2 still holds id 2
    assert_eq!(record["id"], 3);
}

#[tokio::test]
async fn create_on_unknown_entity_materializes_table() {
    let db = MockDataProvider::new();
    let record = db.create("comments", json!({"body": "hi"})).await.unwrap();
    assert_eq!(record["id"], 1);

    let found = db.find_by_id("comments", &json!(1)).await.unwrap();
    assert_eq!(found.unwrap()["body"], "hi");
}

#[tokio::test]
async fn find_by_id_matches_string_and_number() {
    let db = MockDataProvider::new();
    assert!(db.find_by_id("users", &json!(1)).await.unwrap().is_some());
    assert!(db.find_by_id("users", &json!("1")).await.unwrap().is_some());
    assert!(db.find_by_id("users", &json!(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn update_merges_patch_and_keeps_id() {
    let db = MockDataProvider::new();
    let updated = db
        .update("users", &json!(2), json!({"isActive": true, "id": 999}))
        .await
        .unwrap();

    assert_eq!(updated["id"], 2);
    assert_eq!(updated["isActive"], true);
    assert_eq!(updated["name"], "Bob Builder");
}

#[tokio::test]
async fn update_missing_record_is_an_error() {
    let db = MockDataProvider::new();
    let err = db
        .update("users", &json!(99), json!({"name": "Ghost"}))
        .await
        .unwrap_err();
    assert!(matches!(err, formwork_types::Error::NotFound { .. }));
}

#[tokio::test]
async fn delete_acknowledges_removal() {
    let db = MockDataProvider::new();
    let ack = db.delete("users", &json!(1)).await.unwrap();
    assert!(ack.success);

    let ack = db.delete("users", &json!(1)).await.unwrap();
    assert!(!ack.success);

    let page = db.find("users", FindQuery::default()).await.unwrap();
    assert_eq!(page.as_page().unwrap().total, 1);
}

// ── Module wiring ────────────────────────────────────────────────

#[tokio::test]
async fn module_registers_adapter_and_publishes_schema() {
    let mut app = App::new();
    app.use_module(Arc::new(MockDbModule)).unwrap();
    app.start().await.unwrap();

    let provider = app.registry().data_provider().expect("adapter registered");
    let schema = provider.introspect().await.unwrap();
    assert_eq!(schema.entities.len(), 2);

    let published = app.state().get("database.schema").expect("schema published");
    let entities = published["entities"].as_array().unwrap();
    let names: Vec<&Value> = entities.iter().map(|e| &e["name"]).collect();
    assert_eq!(names, vec!["users", "posts"]);
}
