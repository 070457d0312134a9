//! Object instance routes: upsert, get, delete, find.

use std::sync::Arc;

use axum::{
    extract::{Json as JsonExtractor, Path, Query, State},
    response::Json,
};
use grizabella::prelude::*;
use uuid::Uuid;

use crate::{api::dto::{FindObjectsParams, UpsertObjectRequest}, error::ApiResult, filters, state::AppState};

#[utoipa::path(
    put,
    path = "/api/objects/{type_name}",
    tag = "objects",
    request_body = UpsertObjectRequest,
    responses((status = 200, description = "Object upserted", body = serde_json::Value))
)]
pub async fn upsert(
    State(state): State<Arc<AppState>>,
    Path(type_name): Path<String>,
    JsonExtractor(body): JsonExtractor<UpsertObjectRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let object_type = state
        .db
        .get_object_type(&type_name)
        .ok_or_else(|| GrizabellaError::NotFound(format!("object type '{}' does not exist", type_name)))?;
    let props = filters::coerce_properties(&object_type, &body.properties)?;
    let stored = state.db.upsert_object(&type_name, body.id, props, body.weight).await?;
    Ok(Json(serde_json::to_value(stored).unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/api/objects/{type_name}/{id}",
    tag = "objects",
    responses((status = 200, description = "Object", body = serde_json::Value), (status = 404, description = "Not found"))
)]
pub async fn get(State(state): State<Arc<AppState>>, Path((type_name, id)): Path<(String, Uuid)>) -> ApiResult<Json<serde_json::Value>> {
    let object = state
        .db
        .get_object_by_id(&type_name, id)
        .await?
        .ok_or_else(|| GrizabellaError::NotFound(format!("object '{}' not found", id)))?;
    Ok(Json(serde_json::to_value(object).unwrap_or_default()))
}

#[utoipa::path(
    delete,
    path = "/api/objects/{type_name}/{id}",
    tag = "objects",
    responses((status = 200, description = "Deletion result", body = serde_json::Value))
)]
pub async fn delete(State(state): State<Arc<AppState>>, Path((type_name, id)): Path<(String, Uuid)>) -> ApiResult<Json<serde_json::Value>> {
    let deleted = state.db.delete_object(&type_name, id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

#[utoipa::path(
    get,
    path = "/api/objects/{type_name}",
    tag = "objects",
    params(FindObjectsParams),
    responses((status = 200, description = "Matching objects", body = serde_json::Value))
)]
pub async fn find(
    State(state): State<Arc<AppState>>,
    Path(type_name): Path<String>,
    Query(params): Query<FindObjectsParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let parsed_filters = filters::parse_filter_list(params.filter.as_deref())?;
    let objects = state.db.find_objects(&type_name, &parsed_filters, params.limit).await?;
    Ok(Json(serde_json::to_value(objects).unwrap_or_default()))
}
