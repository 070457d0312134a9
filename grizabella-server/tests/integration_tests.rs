use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use grizabella_server::create_router;
use serde_json::{json, Value};
use tempfile::TempDir;

async fn create_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp directory");

    let config = grizabella::config::ConfigBuilder::new()
        .with_data_dir(temp_dir.path())
        .with_log_level(grizabella::config::LogLevel::Warn)
        .build()
        .expect("failed to build config");

    let db = grizabella::init(config).await.expect("failed to initialize engine");

    let server_config = grizabella_server::config::ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: None,
        log_level: None,
    };

    let state = Arc::new(grizabella_server::AppState::new(db, server_config));
    let app = create_router(state);
    let server = TestServer::new(app).expect("failed to create test server");

    (server, temp_dir)
}

fn paper_type() -> Value {
    json!({
        "name": "Paper",
        "description": "A research paper",
        "properties": [
            { "name": "title", "data_type": "TEXT", "is_nullable": false },
            { "name": "year", "data_type": "INTEGER", "is_nullable": true }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn test_swagger_docs_available() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server.get("/docs/").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_openapi_spec_available() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let json: Value = response.json();
    assert_eq!(json["info"]["title"], "Grizabella API");
}

mod schema {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list_object_type() {
        let (server, _temp_dir) = create_test_server().await;

        let response = server
            .post("/api/schema/object-types")
            .json(&json!({ "definition": paper_type() }))
            .await;
        response.assert_status_ok();

        let response = server.get("/api/schema/object-types").await;
        response.assert_status_ok();
        let types: Value = response.json();
        assert_eq!(types.as_array().unwrap().len(), 1);
        assert_eq!(types[0]["name"], "Paper");
    }

    #[tokio::test]
    async fn test_duplicate_object_type_is_conflict() {
        let (server, _temp_dir) = create_test_server().await;

        server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await.assert_status_ok();

        let response = server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "SCHEMA_CONFLICT");
    }

    #[tokio::test]
    async fn test_get_missing_object_type_is_not_found() {
        let (server, _temp_dir) = create_test_server().await;

        let response = server.get("/api/schema/object-types/Nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

mod objects {
    use super::*;

    async fn with_paper_type() -> (TestServer, TempDir) {
        let (server, temp_dir) = create_test_server().await;
        server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await.assert_status_ok();
        (server, temp_dir)
    }

    #[tokio::test]
    async fn test_upsert_get_and_delete_object() {
        let (server, _temp_dir) = with_paper_type().await;

        let response = server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Attention Is All You Need", "year": 2017 } }))
            .await;
        response.assert_status_ok();
        let stored: Value = response.json();
        let id = stored["id"].as_str().unwrap().to_string();

        let response = server.get(&format!("/api/objects/Paper/{}", id)).await;
        response.assert_status_ok();
        let fetched: Value = response.json();
        assert_eq!(fetched["properties"]["title"], "Attention Is All You Need");

        let response = server.delete(&format!("/api/objects/Paper/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["deleted"], true);

        let response = server.get(&format!("/api/objects/Paper/{}", id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_find_objects_by_filter() {
        let (server, _temp_dir) = with_paper_type().await;

        server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Old Paper", "year": 1990 } }))
            .await
            .assert_status_ok();
        server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "New Paper", "year": 2020 } }))
            .await
            .assert_status_ok();

        let response = server.get("/api/objects/Paper?filter=year:gt:2000").await;
        response.assert_status_ok();
        let found: Value = response.json();
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["properties"]["title"], "New Paper");
    }

    #[tokio::test]
    async fn test_upsert_against_unknown_object_type_is_not_found() {
        let (server, _temp_dir) = create_test_server().await;

        let response = server
            .put("/api/objects/Unknown")
            .json(&json!({ "id": null, "properties": {} }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod relations {
    use super::*;

    async fn with_papers_and_citation_type() -> (TestServer, TempDir, String, String) {
        let (server, temp_dir) = create_test_server().await;
        server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await.assert_status_ok();
        server
            .post("/api/schema/relation-types")
            .json(&json!({
                "definition": {
                    "name": "Cites",
                    "description": null,
                    "source_types": ["Paper"],
                    "target_types": ["Paper"],
                    "properties": []
                }
            }))
            .await
            .assert_status_ok();

        let a = server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Paper A", "year": 2020 } }))
            .await
            .json::<Value>();
        let b = server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Paper B", "year": 2021 } }))
            .await
            .json::<Value>();

        (server, temp_dir, a["id"].as_str().unwrap().to_string(), b["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_add_and_query_relation() {
        let (server, _temp_dir, a, b) = with_papers_and_citation_type().await;

        let response = server
            .post("/api/relations/Cites")
            .json(&json!({ "source_type": "Paper", "source_id": a, "target_type": "Paper", "target_id": b, "properties": {} }))
            .await;
        response.assert_status_ok();

        let response = server.get(&format!("/api/objects/{}/relations/outgoing", a)).await;
        response.assert_status_ok();
        let relations: Value = response.json();
        assert_eq!(relations.as_array().unwrap().len(), 1);
        assert_eq!(relations[0]["target_id"], b);
    }

    #[tokio::test]
    async fn test_delete_missing_relation_reports_false() {
        let (server, _temp_dir) = create_test_server().await;

        let response = server.delete(&format!("/api/relations/Cites/{}", uuid::Uuid::new_v4())).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["deleted"], false);
    }
}

mod query {
    use super::*;

    #[tokio::test]
    async fn test_complex_query_finds_objects_by_filter() {
        let (server, _temp_dir) = create_test_server().await;
        server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await.assert_status_ok();
        server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Recent Paper", "year": 2023 } }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/query/complex")
            .json(&json!({
                "query": {
                    "root": {
                        "component": {
                            "object_type": "Paper",
                            "relational_filters": [
                                { "property": "year", "operator": "ge", "value": 2023 }
                            ]
                        }
                    }
                },
                "timeout_secs": null
            }))
            .await;
        response.assert_status_ok();
        let result: Value = response.json();
        assert_eq!(result["instances"].as_array().unwrap().len(), 1);
        assert_eq!(result["cancelled"], false);
    }

    #[tokio::test]
    async fn test_complex_query_accepts_legacy_components_form() {
        let (server, _temp_dir) = create_test_server().await;
        server.post("/api/schema/object-types").json(&json!({ "definition": paper_type() })).await.assert_status_ok();
        server
            .put("/api/objects/Paper")
            .json(&json!({ "id": null, "properties": { "title": "Recent Paper", "year": 2023 } }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/query/complex")
            .json(&json!({
                "query": {
                    "components": [
                        {
                            "object_type": "Paper",
                            "relational_filters": [
                                { "property": "year", "operator": "eq", "value": 2023 }
                            ]
                        }
                    ]
                }
            }))
            .await;
        response.assert_status_ok();
        let result: Value = response.json();
        assert_eq!(result["instances"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_query_tree_is_bad_request() {
        let (server, _temp_dir) = create_test_server().await;

        let response = server
            .post("/api/query/complex")
            .json(&json!({ "query": { "components": [] } }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "QUERY");
    }
}
