//! Request bodies for the Grizabella HTTP API. Responses are returned as
//! `serde_json::Value` (the library types already derive `Serialize`);
//! only request shapes need dedicated, schema-annotated structs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A raw schema definition (`ObjectTypeDefinition`, `RelationTypeDefinition`,
/// or `EmbeddingDefinition`) passed through to `serde_json::from_value`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DefinitionRequest {
    #[schema(value_type = Object)]
    pub definition: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertObjectRequest {
    pub id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub properties: serde_json::Value,
    /// Instance weight in [0, 10]; defaults to 1.0 for new objects.
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddRelationRequest {
    pub source_type: String,
    pub source_id: Uuid,
    pub target_type: String,
    pub target_id: Uuid,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub properties: serde_json::Value,
    /// Instance weight in [0, 10]; defaults to 1.0 for new relations.
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RelationQueryParams {
    pub relation_type: Option<String>,
    pub source_id: Option<Uuid>,
    pub target_id: Option<Uuid>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FindObjectsParams {
    /// Filter expressions of the form `property:operator:value`, comma-separated.
    pub filter: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SimilarQueryParams {
    pub embedding_def: String,
    pub text: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// A boolean query tree in its wire form: either `{"query": {"root": ...}}`
/// with an externally tagged clause tree, or the legacy flat
/// `{"query": {"components": [...]}}` interpreted as the conjunction of its
/// components.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ComplexQueryRequest {
    #[schema(value_type = Object)]
    pub query: serde_json::Value,
    pub timeout_secs: Option<u64>,
}
