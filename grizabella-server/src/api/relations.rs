//! Relation instance routes: add, get, delete, and neighbor traversal.

use std::sync::Arc;

use axum::{
    extract::{Json as JsonExtractor, Path, Query, State},
    response::Json,
};
use grizabella::adapters::RelationQuery;
use grizabella::prelude::*;
use uuid::Uuid;

use crate::{
    api::dto::{AddRelationRequest, RelationQueryParams},
    error::ApiResult,
    filters,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/relations/{relation_type}",
    tag = "relations",
    request_body = AddRelationRequest,
    responses((status = 200, description = "Relation added", body = serde_json::Value))
)]
pub async fn add(
    State(state): State<Arc<AppState>>,
    Path(relation_type): Path<String>,
    JsonExtractor(body): JsonExtractor<AddRelationRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let relation_def = state
        .db
        .get_relation_type(&relation_type)
        .ok_or_else(|| GrizabellaError::NotFound(format!("relation type '{}' does not exist", relation_type)))?;
    let props = filters::coerce_relation_properties(&relation_def, &body.properties)?;
    let relation = state
        .db
        .add_relation(
            &relation_type,
            &body.source_type,
            body.source_id,
            &body.target_type,
            body.target_id,
            props,
            body.weight,
        )
        .await?;
    Ok(Json(serde_json::to_value(relation).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/relations/{relation_type}/{source_id}/{target_id}",
    tag = "relations",
    responses((status = 200, description = "Matching relations", body = serde_json::Value))
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path((relation_type, source_id, target_id)): Path<(String, Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let relations = state.db.get_relation(source_id, target_id, &relation_type).await?;
    Ok(Json(serde_json::to_value(relations).unwrap_or_default()))
}

#[utoipa::path(
    delete,
    path = "/api/relations/{relation_type}/{id}",
    tag = "relations",
    responses((status = 200, description = "Deletion result", body = serde_json::Value))
)]
pub async fn delete(State(state): State<Arc<AppState>>, Path((relation_type, id)): Path<(String, Uuid)>) -> ApiResult<Json<serde_json::Value>> {
    let deleted = state.db.delete_relation(&relation_type, id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}/relations/outgoing",
    tag = "relations",
    responses((status = 200, description = "Outgoing relations", body = serde_json::Value))
)]
pub async fn outgoing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<RelationQueryParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let relations = state.db.get_outgoing_relations(id, params.relation_type.as_deref()).await?;
    Ok(Json(serde_json::to_value(relations).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}/relations/incoming",
    tag = "relations",
    responses((status = 200, description = "Incoming relations", body = serde_json::Value))
)]
pub async fn incoming(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<RelationQueryParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let relations = state.db.get_incoming_relations(id, params.relation_type.as_deref()).await?;
    Ok(Json(serde_json::to_value(relations).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/relations",
    tag = "relations",
    params(RelationQueryParams),
    responses((status = 200, description = "Matching relations", body = serde_json::Value))
)]
pub async fn query(State(state): State<Arc<AppState>>, Query(params): Query<RelationQueryParams>) -> ApiResult<Json<serde_json::Value>> {
    let relations = state
        .db
        .query_relations(RelationQuery {
            relation_type: params.relation_type,
            source_id: params.source_id,
            target_id: params.target_id,
            limit: params.limit,
            ..Default::default()
        })
        .await?;
    Ok(Json(serde_json::to_value(relations).unwrap_or_default()))
}
