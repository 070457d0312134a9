//! API implementation for the Grizabella HTTP server.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod dto;
pub mod objects;
pub mod query;
pub mod relations;
pub mod schema;

#[derive(OpenApi)]
#[openapi(
    paths(
        schema::create_object_type,
        schema::get_object_type,
        schema::list_object_types,
        schema::delete_object_type,
        schema::create_relation_type,
        schema::get_relation_type,
        schema::list_relation_types,
        schema::delete_relation_type,
        schema::create_embedding_definition,
        schema::get_embedding_definition,
        schema::list_embedding_definitions,
        schema::delete_embedding_definition,
        schema::backfill,
        objects::upsert,
        objects::get,
        objects::delete,
        objects::find,
        relations::add,
        relations::get,
        relations::delete,
        relations::outgoing,
        relations::incoming,
        relations::query,
        query::similar,
        query::neighbors,
        query::embed,
        query::complex,
    ),
    components(schemas(
        dto::DefinitionRequest,
        dto::UpsertObjectRequest,
        dto::AddRelationRequest,
        dto::ComplexQueryRequest,
    )),
    tags(
        (name = "schema", description = "Object-type, relation-type, and embedding-definition management"),
        (name = "objects", description = "Object instance CRUD"),
        (name = "relations", description = "Relation instance CRUD and traversal"),
        (name = "query", description = "Similarity search and complex boolean queries"),
    ),
    info(
        title = "Grizabella API",
        version = "1.0.0",
        description = "HTTP API for the Grizabella tri-store knowledge engine",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "/api", description = "API base path"))
)]
pub struct ApiDoc;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/schema/object-types", post(schema::create_object_type))
        .route("/schema/object-types", get(schema::list_object_types))
        .route("/schema/object-types/{name}", get(schema::get_object_type))
        .route("/schema/object-types/{name}", delete(schema::delete_object_type))
        .route("/schema/relation-types", post(schema::create_relation_type))
        .route("/schema/relation-types", get(schema::list_relation_types))
        .route("/schema/relation-types/{name}", get(schema::get_relation_type))
        .route("/schema/relation-types/{name}", delete(schema::delete_relation_type))
        .route("/schema/embedding-definitions", post(schema::create_embedding_definition))
        .route("/schema/embedding-definitions", get(schema::list_embedding_definitions))
        .route("/schema/embedding-definitions/{name}", get(schema::get_embedding_definition))
        .route("/schema/embedding-definitions/{name}", delete(schema::delete_embedding_definition))
        .route(
            "/schema/object-types/{object_type}/embedding-definitions/{embedding_definition}/backfill",
            post(schema::backfill),
        )
        .route("/objects/{type_name}", put(objects::upsert))
        .route("/objects/{type_name}", get(objects::find))
        .route("/objects/{type_name}/{id}", get(objects::get))
        .route("/objects/{type_name}/{id}", delete(objects::delete))
        .route("/relations/{relation_type}", post(relations::add))
        .route("/relations/{relation_type}/{id}", delete(relations::delete))
        .route("/relations/{relation_type}/{source_id}/{target_id}", get(relations::get))
        .route("/relations", get(relations::query))
        .route("/objects/{id}/relations/outgoing", get(relations::outgoing))
        .route("/objects/{id}/relations/incoming", get(relations::incoming))
        .route("/query/similar", get(query::similar))
        .route("/query/neighbors/{object_type}/{id}", get(query::neighbors))
        .route("/query/embedding", get(query::embed))
        .route("/query/complex", post(query::complex))
        .route("/health", get(health_check))
        .with_state(state);

    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = serde_json::Value))
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let pending_repairs = state.db.pending_repairs().await.map(|r| r.len()).unwrap_or(0);
    Json(serde_json::json!({ "status": "OK", "pending_repairs": pending_repairs }))
}
