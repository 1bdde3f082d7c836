use formwork_types::{
    DeleteAck, FindQuery, FindResult, PaginatedResponse, SortDirection, SortSpec,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

// ── SortSpec parsing ─────────────────────────────────────────────

#[test]
fn sort_spec_parses_ascending() {
    let s: SortSpec = "name:asc".parse().unwrap();
    assert_eq!(s.field, "name");
    assert_eq!(s.direction, SortDirection::Ascending);
}

#[test]
fn sort_spec_parses_descending() {
    let s: SortSpec = "createdAt:desc".parse().unwrap();
    assert_eq!(s.field, "createdAt");
    assert_eq!(s.direction, SortDirection::Descending);
}

#[test]
fn sort_spec_bare_field_is_ascending() {
    let s: SortSpec = "name".parse().unwrap();
    assert_eq!(s, SortSpec::ascending("name"));
}

#[test]
fn sort_spec_rejects_bad_direction() {
    assert!("name:sideways".parse::<SortSpec>().is_err());
}

#[test]
fn sort_spec_rejects_empty_field() {
    assert!(":asc".parse::<SortSpec>().is_err());
    assert!("".parse::<SortSpec>().is_err());
}

#[test]
fn sort_spec_display_roundtrip() {
    let s = SortSpec::descending("publishedAt");
    assert_eq!(s.to_string(), "publishedAt:desc");
    assert_eq!(s.to_string().parse::<SortSpec>().unwrap(), s);
}

#[test]
fn sort_spec_serializes_as_string() {
    let json = serde_json::to_string(&SortSpec::ascending("name")).unwrap();
    assert_eq!(json, "\"name:asc\"");
}

proptest! {
    #[test]
    fn sort_spec_roundtrips_for_any_field(field in "[a-zA-Z][a-zA-Z0-9_]{0,30}", desc in any::<bool>()) {
        let spec = if desc {
            SortSpec::descending(field.clone())
        } else {
            SortSpec::ascending(field.clone())
        };
        let parsed: SortSpec = spec.to_string().parse().unwrap();
        prop_assert_eq!(parsed, spec);
    }
}

// ── FindQuery ────────────────────────────────────────────────────

#[test]
fn find_query_builder() {
    let q = FindQuery::default()
        .page(2)
        .limit(25)
        .q("alice")
        .sort(SortSpec::ascending("name"))
        .filter("role", "admin");

    assert_eq!(q.page, Some(2));
    assert_eq!(q.limit, Some(25));
    assert_eq!(q.q.as_deref(), Some("alice"));
    assert_eq!(q.filter["role"], "admin");
}

#[test]
fn find_query_deserializes_from_sparse_json() {
    let q: FindQuery = serde_json::from_str(r#"{"page": 1, "sort": "name:desc"}"#).unwrap();
    assert_eq!(q.page, Some(1));
    assert_eq!(q.limit, None);
    assert_eq!(q.sort, Some(SortSpec::descending("name")));
    assert!(q.filter.is_empty());
}

#[test]
fn find_query_default_is_empty() {
    let json = serde_json::to_value(FindQuery::default()).unwrap();
    assert_eq!(json, json!({}));
}

// ── FindResult ───────────────────────────────────────────────────

#[test]
fn find_result_page_records() {
    let result = FindResult::Page(PaginatedResponse {
        data: vec![json!({"id": 1}), json!({"id": 2})],
        total: 2,
        page: 1,
        limit: 10,
    });
    assert_eq!(result.records().len(), 2);
    assert_eq!(result.as_page().unwrap().total, 2);
}

#[test]
fn find_result_items_records() {
    let result = FindResult::Items(vec![json!({"id": 1})]);
    assert_eq!(result.records().len(), 1);
    assert!(result.as_page().is_none());
}

#[test]
fn find_result_deserializes_both_shapes() {
    let page: FindResult =
        serde_json::from_str(r#"{"data": [], "total": 0, "page": 3, "limit": 5}"#).unwrap();
    assert_eq!(page.as_page().unwrap().page, 3);

    let items: FindResult = serde_json::from_str(r#"[{"id": 1}]"#).unwrap();
    assert!(items.as_page().is_none());
    assert_eq!(items.records().len(), 1);
}

// ── DeleteAck ────────────────────────────────────────────────────

#[test]
fn delete_ack_wire_shape() {
    let json = serde_json::to_value(DeleteAck { success: true }).unwrap();
    assert_eq!(json, json!({"success": true}));
}
