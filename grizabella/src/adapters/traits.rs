//! Adapter trait contracts. Each store is a pure interface; concrete
//! backends are interchangeable behind `Arc<dyn Trait>` handles.

use super::error::AdapterResult;
use super::filter::RelFilter;
use crate::types::{ObjectInstance, RelationInstance};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// The reserved metadata tables the relational adapter persists schema
/// state and coherence-repair ledger entries through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaTable {
    ObjectTypes,
    RelationTypes,
    EmbeddingDefinitions,
    CoherenceRepair,
}

impl MetaTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            MetaTable::ObjectTypes => "_meta_object_types",
            MetaTable::RelationTypes => "_meta_relation_types",
            MetaTable::EmbeddingDefinitions => "_meta_embedding_definitions",
            MetaTable::CoherenceRepair => "_coherence_repair",
        }
    }
}

/// A narrow query against the relation table: relation type, endpoints,
/// and property filters are all optional and conjoined when present.
#[derive(Debug, Clone, Default)]
pub struct RelationQuery {
    pub relation_type: Option<String>,
    pub source_id: Option<Uuid>,
    pub target_id: Option<Uuid>,
    pub property_filters: Vec<RelFilter>,
    pub limit: Option<usize>,
}

/// Authoritative store for schema metadata and object/relation property
/// values.
#[async_trait]
pub trait RelationalAdapter: Send + Sync + std::fmt::Debug {
    /// Idempotent upsert by `object.id()`; enforces uniqueness/PK
    /// constraints declared on the type (callers pass pre-validated rows;
    /// the adapter still enforces uniqueness since it's the source of truth).
    async fn upsert_object(&self, type_name: &str, object: ObjectInstance) -> AdapterResult<()>;
    async fn get_object(&self, type_name: &str, id: Uuid) -> AdapterResult<Option<ObjectInstance>>;
    async fn delete_object(&self, type_name: &str, id: Uuid) -> AdapterResult<bool>;
    async fn find_objects(
        &self,
        type_name: &str,
        filters: &[RelFilter],
        limit: Option<usize>,
    ) -> AdapterResult<Vec<ObjectInstance>>;
    async fn count_objects(&self, type_name: &str) -> AdapterResult<usize>;
    /// Whether a property value is already taken by a different object of
    /// this type (used to enforce `is_unique`).
    async fn object_property_taken(
        &self,
        type_name: &str,
        property: &str,
        value: &crate::types::PropertyValue,
        excluding_id: Option<Uuid>,
    ) -> AdapterResult<bool>;

    async fn upsert_relation(
        &self,
        relation_type: &str,
        relation: RelationInstance,
    ) -> AdapterResult<()>;
    async fn get_relation(
        &self,
        relation_type: &str,
        id: Uuid,
    ) -> AdapterResult<Option<RelationInstance>>;
    async fn delete_relation(&self, relation_type: &str, id: Uuid) -> AdapterResult<bool>;
    async fn find_relations(&self, query: RelationQuery) -> AdapterResult<Vec<RelationInstance>>;

    /// Persist a named JSON blob into one of the reserved metadata tables.
    async fn put_meta(
        &self,
        table: MetaTable,
        key: &str,
        value: serde_json::Value,
    ) -> AdapterResult<()>;
    async fn get_meta(&self, table: MetaTable, key: &str) -> AdapterResult<Option<serde_json::Value>>;
    async fn list_meta(&self, table: MetaTable) -> AdapterResult<Vec<(String, serde_json::Value)>>;
    async fn delete_meta(&self, table: MetaTable, key: &str) -> AdapterResult<bool>;
}

/// Per (object-type, embedding-definition) vector collection.
#[async_trait]
pub trait VectorAdapter: Send + Sync + std::fmt::Debug {
    async fn ensure_collection(&self, embedding_def: &str, dimensions: usize) -> AdapterResult<()>;
    async fn upsert(
        &self,
        embedding_def: &str,
        object_id: Uuid,
        vector: Vec<f32>,
        preview: Option<String>,
    ) -> AdapterResult<()>;
    async fn delete(&self, embedding_def: &str, object_id: Uuid) -> AdapterResult<bool>;
    async fn get_preview(
        &self,
        embedding_def: &str,
        object_id: Uuid,
    ) -> AdapterResult<Option<String>>;
    async fn has_vector(&self, embedding_def: &str, object_id: Uuid) -> AdapterResult<bool>;
    /// Best-first similarity search. `threshold` is inclusive: cosine
    /// similarity `>= threshold`, L2 distance `<= threshold`.
    async fn search(
        &self,
        embedding_def: &str,
        query_vector: &[f32],
        limit: usize,
        threshold: Option<f32>,
        is_l2: bool,
    ) -> AdapterResult<Vec<(Uuid, f32)>>;
}

/// Direction of a graph hop relative to the anchor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// Typed directed-edge store; nodes mirror the relational store by opaque
/// `(type_name, id)` identity.
#[async_trait]
pub trait GraphAdapter: Send + Sync + std::fmt::Debug {
    async fn upsert_node(&self, type_name: &str, id: Uuid) -> AdapterResult<()>;
    async fn delete_node(&self, type_name: &str, id: Uuid) -> AdapterResult<bool>;
    async fn node_exists(&self, type_name: &str, id: Uuid) -> AdapterResult<bool>;

    async fn upsert_edge(
        &self,
        relation_type: &str,
        id: Uuid,
        source: (String, Uuid),
        target: (String, Uuid),
    ) -> AdapterResult<()>;
    async fn delete_edge(&self, relation_type: &str, id: Uuid) -> AdapterResult<bool>;

    /// For each anchor in `anchors`, the set of target ids reachable by one
    /// hop of `relation_type` in `direction`, restricted to `target_type`
    /// and (if given) a single pinned `target_id`. The executor applies
    /// `target_property_filters` itself via the relational adapter.
    async fn neighbors(
        &self,
        anchors: &[Uuid],
        relation_type: &str,
        direction: Direction,
        target_type: &str,
        target_id: Option<Uuid>,
        limit: Option<usize>,
    ) -> AdapterResult<HashMap<Uuid, Vec<Uuid>>>;
}
