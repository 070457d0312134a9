//! Integration tests for the Grizabella CLI command handlers.
//!
//! These exercise `grizabella_cli::handlers::*` directly against an
//! isolated, temp-rooted `Grizabella` instance — the same path `main.rs`
//! drives, minus process spawning.

use grizabella::config::ConfigBuilder;
use grizabella::prelude::*;
use grizabella_cli::handlers::{object, query, relation, schema};
use grizabella_cli::GrizabellaCliContext;
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

async fn test_context() -> (GrizabellaCliContext, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = ConfigBuilder::new()
        .with_data_dir(temp_dir.path())
        .with_log_level(grizabella::config::LogLevel::Warn)
        .build()
        .expect("build config");
    let db = grizabella::init(config).await.expect("init grizabella");
    (GrizabellaCliContext { db }, temp_dir)
}

fn paper_type_json() -> String {
    json!({
        "name": "Paper",
        "description": "A research paper",
        "properties": [
            { "name": "title", "data_type": "TEXT", "is_nullable": false },
            { "name": "year", "data_type": "INTEGER", "is_nullable": true }
        ]
    })
    .to_string()
}

fn cites_type_json() -> String {
    json!({
        "name": "Cites",
        "description": null,
        "source_types": ["Paper"],
        "target_types": ["Paper"],
        "properties": []
    })
    .to_string()
}

#[tokio::test]
async fn create_and_list_object_type() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");

    let def = ctx.db.get_object_type("Paper").expect("object type exists");
    assert_eq!(def.name, "Paper");
    assert_eq!(def.properties.len(), 2);

    let all = ctx.db.list_object_types();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn duplicate_object_type_is_schema_conflict() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("first create succeeds");
    let err = schema::create_object_type(&ctx, &paper_type_json(), "json").await.unwrap_err();
    assert!(matches!(err, GrizabellaError::SchemaConflict(_)));
}

#[tokio::test]
async fn delete_object_type_blocked_by_live_instances() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");

    let props = json!({ "title": "Graph Theory", "year": 1970 }).to_string();
    object::upsert(&ctx, "Paper", None, &props, None, "json").await.expect("upsert object");

    let err = schema::delete_object_type(&ctx, "Paper", "json").await.unwrap_err();
    assert!(matches!(err, GrizabellaError::SchemaConflict(_)));
}

#[tokio::test]
async fn upsert_get_find_and_delete_object() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");

    let props = json!({ "title": "Graph Theory", "year": 1970 }).to_string();
    object::upsert(&ctx, "Paper", None, &props, None, "json").await.expect("upsert object");

    let stored = ctx
        .db
        .find_objects("Paper", &[], None)
        .await
        .expect("find objects")
        .into_iter()
        .next()
        .expect("at least one object");
    let id = stored.id();

    object::get(&ctx, "Paper", id, "json").await.expect("get object");

    let filters = vec![RelFilter::new("year", Operator::Gt, PropertyValue::Integer(1900))];
    object::find(&ctx, "Paper", &filters, None, "json").await.expect("find with filter");

    let fetched = ctx.db.get_object_by_id("Paper", id).await.expect("lookup succeeds");
    assert!(fetched.is_some());

    object::delete(&ctx, "Paper", id, "json").await.expect("delete object");
    let gone = ctx.db.get_object_by_id("Paper", id).await.expect("lookup succeeds");
    assert!(gone.is_none());
}

#[tokio::test]
async fn reject_undeclared_property_key() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");

    let props = json!({ "title": "Graph Theory", "publisher": "MIT Press" }).to_string();
    let err = object::upsert(&ctx, "Paper", None, &props, None, "json").await.unwrap_err();
    assert!(matches!(err, GrizabellaError::Validation(_)));
}

#[tokio::test]
async fn add_and_query_relations() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");
    schema::create_relation_type(&ctx, &cites_type_json(), "json").await.expect("create relation type");

    let a = ctx
        .db
        .upsert_object("Paper", None, props_map(&json!({ "title": "A" })), None)
        .await
        .expect("upsert a");
    let b = ctx
        .db
        .upsert_object("Paper", None, props_map(&json!({ "title": "B" })), None)
        .await
        .expect("upsert b");

    relation::add(&ctx, "Cites", "Paper", a.id(), "Paper", b.id(), "{}", None, "json")
        .await
        .expect("add relation");

    relation::get(&ctx, a.id(), b.id(), "Cites", "json").await.expect("get relation");
    relation::outgoing(&ctx, a.id(), Some("Cites"), "json").await.expect("outgoing");
    relation::incoming(&ctx, b.id(), Some("Cites"), "json").await.expect("incoming");
    relation::query(&ctx, Some("Cites".to_string()), Some(a.id()), None, None, "json")
        .await
        .expect("query relations");

    let outgoing = ctx.db.get_outgoing_relations(a.id(), Some("Cites")).await.expect("outgoing");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].target_id, b.id());
}

#[tokio::test]
async fn delete_missing_object_reports_false_without_error() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");
    object::delete(&ctx, "Paper", Uuid::new_v4(), "json")
        .await
        .expect("deleting a missing object is not an error");
}

#[tokio::test]
async fn upsert_against_unknown_object_type_is_not_found() {
    let (ctx, _dir) = test_context().await;
    let props = json!({ "title": "orphan" }).to_string();
    let err = object::upsert(&ctx, "Paper", None, &props, None, "json").await.unwrap_err();
    assert!(matches!(err, GrizabellaError::NotFound(_)));
}

#[tokio::test]
async fn complex_query_finds_objects_by_filter() {
    let (ctx, _dir) = test_context().await;
    schema::create_object_type(&ctx, &paper_type_json(), "json").await.expect("create object type");
    ctx.db
        .upsert_object("Paper", None, props_map(&json!({ "title": "Old", "year": 1950 })), None)
        .await
        .expect("upsert old");
    ctx.db
        .upsert_object("Paper", None, props_map(&json!({ "title": "New", "year": 2020 })), None)
        .await
        .expect("upsert new");

    let spec = json!({
        "object_type": "Paper",
        "filters": ["year:gt:2000"]
    })
    .to_string();

    query::complex(&ctx, &spec, None, "json").await.expect("complex query");
}

fn props_map(raw: &serde_json::Value) -> std::collections::HashMap<String, PropertyValue> {
    let obj = raw.as_object().expect("object");
    let mut map = std::collections::HashMap::new();
    for (k, v) in obj {
        let value = match v {
            serde_json::Value::String(s) => PropertyValue::Text(s.clone()),
            serde_json::Value::Number(n) if n.is_i64() => PropertyValue::Integer(n.as_i64().unwrap()),
            serde_json::Value::Number(n) => PropertyValue::Float(n.as_f64().unwrap()),
            other => PropertyValue::Json(other.clone()),
        };
        map.insert(k.clone(), value);
    }
    map
}
