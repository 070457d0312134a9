//! Similarity search and complex boolean query routes.

use std::sync::Arc;

use axum::{
    extract::{Json as JsonExtractor, Path, Query, State},
    response::Json,
};
use grizabella::prelude::*;
use grizabella::query::Query as ComplexQuery;
use std::time::Duration;
use uuid::Uuid;

use crate::{api::dto::{ComplexQueryRequest, SimilarQueryParams}, error::ApiResult, state::AppState};

#[utoipa::path(
    get,
    path = "/api/query/similar",
    tag = "query",
    params(SimilarQueryParams),
    responses((status = 200, description = "Objects similar to the query text", body = serde_json::Value))
)]
pub async fn similar(State(state): State<Arc<AppState>>, Query(params): Query<SimilarQueryParams>) -> ApiResult<Json<serde_json::Value>> {
    let results = state.db.find_similar(&params.embedding_def, &params.text, params.limit, None).await?;
    let as_json: Vec<_> = results
        .iter()
        .map(|(o, score)| serde_json::json!({ "object": o, "score": score }))
        .collect();
    Ok(Json(serde_json::Value::Array(as_json)))
}

#[utoipa::path(
    get,
    path = "/api/query/neighbors/{object_type}/{id}",
    tag = "query",
    responses((status = 200, description = "Objects similar to the given object", body = serde_json::Value))
)]
pub async fn neighbors(
    State(state): State<Arc<AppState>>,
    Path((object_type, id)): Path<(String, Uuid)>,
    Query(params): Query<NeighborsParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let results = state.db.search_similar_objects(id, &object_type, params.n.unwrap_or(10), None).await?;
    let as_json: Vec<_> = results
        .iter()
        .map(|(o, score)| serde_json::json!({ "object": o, "score": score }))
        .collect();
    Ok(Json(serde_json::Value::Array(as_json)))
}

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct NeighborsParams {
    pub n: Option<usize>,
}

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct EmbedParams {
    pub embedding_def: String,
    pub text: String,
}

#[utoipa::path(
    get,
    path = "/api/query/embedding",
    tag = "query",
    params(EmbedParams),
    responses((status = 200, description = "Embedding vector for the text", body = serde_json::Value))
)]
pub async fn embed(State(state): State<Arc<AppState>>, Query(params): Query<EmbedParams>) -> ApiResult<Json<serde_json::Value>> {
    let vector = state.db.get_embedding_vector_for_text(&params.text, &params.embedding_def).await?;
    Ok(Json(serde_json::to_value(vector).unwrap_or_default()))
}

#[utoipa::path(
    post,
    path = "/api/query/complex",
    tag = "query",
    request_body = ComplexQueryRequest,
    responses((status = 200, description = "Query result", body = serde_json::Value))
)]
pub async fn complex(
    State(state): State<Arc<AppState>>,
    JsonExtractor(body): JsonExtractor<ComplexQueryRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let query: ComplexQuery = serde_json::from_value(body.query)
        .map_err(|e| GrizabellaError::Query(format!("malformed query tree: {}", e)))?;
    let timeout = body.timeout_secs.map(Duration::from_secs);
    let result = state.db.execute_complex_query(&query, timeout).await?;
    Ok(Json(serde_json::to_value(result).unwrap_or_default()))
}
