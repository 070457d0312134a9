//! Object-type, relation-type, and embedding-definition routes.

use std::sync::Arc;

use axum::{
    extract::{Json as JsonExtractor, Path, State},
    response::Json,
};
use grizabella::prelude::*;

use crate::{api::dto::DefinitionRequest, error::ApiResult, state::AppState};

#[utoipa::path(
    post,
    path = "/api/schema/object-types",
    tag = "schema",
    request_body = DefinitionRequest,
    responses((status = 200, description = "Object type created", body = serde_json::Value))
)]
pub async fn create_object_type(
    State(state): State<Arc<AppState>>,
    JsonExtractor(body): JsonExtractor<DefinitionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let def: ObjectTypeDefinition =
        serde_json::from_value(body.definition).map_err(|e| GrizabellaError::Validation(format!("malformed object type: {}", e)))?;
    let name = def.name.clone();
    state.db.create_object_type(def).await?;
    Ok(Json(serde_json::json!({ "created": name })))
}

#[utoipa::path(
    get,
    path = "/api/schema/object-types/{name}",
    tag = "schema",
    responses((status = 200, description = "Object type", body = serde_json::Value), (status = 404, description = "Not found"))
)]
pub async fn get_object_type(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    let def = state
        .db
        .get_object_type(&name)
        .ok_or_else(|| GrizabellaError::NotFound(format!("object type '{}' not found", name)))?;
    Ok(Json(serde_json::to_value(def).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/schema/object-types",
    tag = "schema",
    responses((status = 200, description = "All object types", body = serde_json::Value))
)]
pub async fn list_object_types(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::to_value(state.db.list_object_types()).unwrap_or_default())
}

#[utoipa::path(
    delete,
    path = "/api/schema/object-types/{name}",
    tag = "schema",
    responses((status = 200, description = "Object type deleted", body = serde_json::Value))
)]
pub async fn delete_object_type(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    state.db.delete_object_type(&name).await?;
    Ok(Json(serde_json::json!({ "deleted": name })))
}

#[utoipa::path(
    post,
    path = "/api/schema/relation-types",
    tag = "schema",
    request_body = DefinitionRequest,
    responses((status = 200, description = "Relation type created", body = serde_json::Value))
)]
pub async fn create_relation_type(
    State(state): State<Arc<AppState>>,
    JsonExtractor(body): JsonExtractor<DefinitionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let def: RelationTypeDefinition = serde_json::from_value(body.definition)
        .map_err(|e| GrizabellaError::Validation(format!("malformed relation type: {}", e)))?;
    let name = def.name.clone();
    state.db.create_relation_type(def).await?;
    Ok(Json(serde_json::json!({ "created": name })))
}

#[utoipa::path(
    get,
    path = "/api/schema/relation-types/{name}",
    tag = "schema",
    responses((status = 200, description = "Relation type", body = serde_json::Value), (status = 404, description = "Not found"))
)]
pub async fn get_relation_type(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    let def = state
        .db
        .get_relation_type(&name)
        .ok_or_else(|| GrizabellaError::NotFound(format!("relation type '{}' not found", name)))?;
    Ok(Json(serde_json::to_value(def).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/schema/relation-types",
    tag = "schema",
    responses((status = 200, description = "All relation types", body = serde_json::Value))
)]
pub async fn list_relation_types(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::to_value(state.db.list_relation_types()).unwrap_or_default())
}

#[utoipa::path(
    delete,
    path = "/api/schema/relation-types/{name}",
    tag = "schema",
    responses((status = 200, description = "Relation type deleted", body = serde_json::Value))
)]
pub async fn delete_relation_type(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    state.db.delete_relation_type(&name).await?;
    Ok(Json(serde_json::json!({ "deleted": name })))
}

#[utoipa::path(
    post,
    path = "/api/schema/embedding-definitions",
    tag = "schema",
    request_body = DefinitionRequest,
    responses((status = 200, description = "Embedding definition created", body = serde_json::Value))
)]
pub async fn create_embedding_definition(
    State(state): State<Arc<AppState>>,
    JsonExtractor(body): JsonExtractor<DefinitionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let def: EmbeddingDefinition = serde_json::from_value(body.definition)
        .map_err(|e| GrizabellaError::Validation(format!("malformed embedding definition: {}", e)))?;
    let name = def.name.clone();
    state.db.create_embedding_definition(def).await?;
    Ok(Json(serde_json::json!({ "created": name })))
}

#[utoipa::path(
    get,
    path = "/api/schema/embedding-definitions/{name}",
    tag = "schema",
    responses((status = 200, description = "Embedding definition", body = serde_json::Value), (status = 404, description = "Not found"))
)]
pub async fn get_embedding_definition(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    let def = state
        .db
        .get_embedding_definition(&name)
        .ok_or_else(|| GrizabellaError::NotFound(format!("embedding definition '{}' not found", name)))?;
    Ok(Json(serde_json::to_value(def).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/schema/embedding-definitions",
    tag = "schema",
    responses((status = 200, description = "All embedding definitions", body = serde_json::Value))
)]
pub async fn list_embedding_definitions(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::to_value(state.db.list_embedding_definitions()).unwrap_or_default())
}

#[utoipa::path(
    delete,
    path = "/api/schema/embedding-definitions/{name}",
    tag = "schema",
    responses((status = 200, description = "Embedding definition deleted", body = serde_json::Value))
)]
pub async fn delete_embedding_definition(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    state.db.delete_embedding_definition(&name).await?;
    Ok(Json(serde_json::json!({ "deleted": name })))
}

#[utoipa::path(
    post,
    path = "/api/schema/object-types/{object_type}/embedding-definitions/{embedding_definition}/backfill",
    tag = "schema",
    responses((status = 200, description = "Objects backfilled", body = serde_json::Value))
)]
pub async fn backfill(
    State(state): State<Arc<AppState>>,
    Path((object_type, embedding_definition)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let embedded = state.db.backfill_embeddings(&object_type, &embedding_definition).await?;
    Ok(Json(serde_json::json!({ "embedded": embedded })))
}
