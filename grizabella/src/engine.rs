//! The public, in-process API: a thin facade over the registry, the
//! write coordinator, and the query engine.

use crate::adapters::{
    GraphAdapter, InMemoryGraph, InMemoryRelational, InMemoryVector, MetaTable, RelFilter, RelationQuery,
    RelationalAdapter, VectorAdapter,
};
use crate::config::{GrizabellaConfig, RetryConfig};
use crate::embedding::{Embedder, EmbeddingCoordinator, HashEmbedder};
use crate::error::{GrizabellaError, Result};
use crate::query::{Executor, Planner, Query, QueryResult};
use crate::schema::Registry;
use crate::types::{
    EmbeddingDefinition, ObjectInstance, ObjectTypeDefinition, PropertyValue, RelationInstance,
    RelationTypeDefinition,
};
use crate::write::WriteCoordinator;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;
use uuid::Uuid;

/// Default vector width for the built-in `reference-hash-embedder`,
/// matching the one deterministic embedder shipped with the engine.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;

/// The tri-store knowledge engine: one schema registry, three store
/// adapters, and the coordinators that keep writes and queries consistent
/// across them.
#[derive(Debug)]
pub struct Grizabella {
    registry: Arc<Registry>,
    relational: Arc<dyn RelationalAdapter>,
    vector: Arc<dyn VectorAdapter>,
    graph: Arc<dyn GraphAdapter>,
    write: WriteCoordinator,
    embeddings: Arc<EmbeddingCoordinator>,
    retry: RetryConfig,
    backfill_batch_size: usize,
}

impl Grizabella {
    /// Open an engine backed by the in-memory reference adapters. A real
    /// deployment would substitute persistent adapters here without
    /// touching any call site below.
    pub async fn open(config: GrizabellaConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(DEFAULT_EMBEDDING_DIMENSIONS));
        Self::open_with_embedders(config, vec![embedder]).await
    }

    pub async fn open_with_embedders(config: GrizabellaConfig, embedders: Vec<Arc<dyn Embedder>>) -> Result<Self> {
        let db_path = crate::config::resolve_db_path(&config.storage);
        tracing::info!(path = %db_path.display(), "opening grizabella instance");

        let registry = Arc::new(Registry::new());
        let relational: Arc<dyn RelationalAdapter> = Arc::new(InMemoryRelational::new());
        let vector: Arc<dyn VectorAdapter> = Arc::new(InMemoryVector::new());
        let graph: Arc<dyn GraphAdapter> = Arc::new(InMemoryGraph::new());
        let embeddings = Arc::new(EmbeddingCoordinator::new(
            registry.clone(),
            vector.clone(),
            embedders,
            config.embedding.preview_truncate_bytes,
        ));
        let write = WriteCoordinator::new(registry.clone(), relational.clone(), graph.clone(), embeddings.clone());

        load_persisted_schema(&registry, relational.as_ref()).await?;

        Ok(Self {
            registry,
            relational,
            vector,
            graph,
            write,
            embeddings,
            retry: config.retry,
            backfill_batch_size: config.embedding.backfill_batch_size,
        })
    }

    /// An isolated engine suitable for tests: the `testing()` config preset
    /// plus the default hash embedder.
    pub async fn testing() -> Result<Self> {
        let config = crate::config::ConfigBuilder::testing().build()?;
        Self::open(config).await
    }

    /// Run an operation under the retry policy and the configured
    /// per-operation deadline: `Unavailable` errors back off and
    /// retry, everything else propagates, and blowing the deadline yields
    /// `Cancelled`.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.retry.operation_timeout_ms {
            Some(budget_ms) => {
                tokio::time::timeout(Duration::from_millis(budget_ms), self.retry_loop(op))
                    .await
                    .map_err(|_| GrizabellaError::Cancelled)?
            }
            None => self.retry_loop(op).await,
        }
    }

    async fn retry_loop<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        let mut delay_ms = self.retry.base_delay_ms;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.retryable() && attempt + 1 < self.retry.max_attempts => {
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = (delay_ms * 2).min(self.retry.max_delay_ms);
                }
                Err(err) => return Err(err),
            }
        }
    }

    // ---- Schema: object types -------------------------------------------------

    #[instrument(skip(self, def))]
    pub async fn create_object_type(&self, def: ObjectTypeDefinition) -> Result<()> {
        let name = def.name.clone();
        let persisted = serde_json::to_value(&def).expect("object type definition always serializes");
        self.registry.create_object_type(def)?;
        if let Err(err) = self.relational.put_meta(MetaTable::ObjectTypes, &name, persisted).await {
            let _ = self.registry.delete_object_type(&name);
            return Err(err.into());
        }
        Ok(())
    }

    pub fn get_object_type(&self, name: &str) -> Option<ObjectTypeDefinition> {
        self.registry.get_object_type(name)
    }

    pub fn list_object_types(&self) -> Vec<ObjectTypeDefinition> {
        self.registry.list_object_types()
    }

    #[instrument(skip(self))]
    pub async fn delete_object_type(&self, name: &str) -> Result<()> {
        let count = self.relational.count_objects(name).await?;
        if count > 0 {
            return Err(GrizabellaError::SchemaConflict(format!(
                "object type '{}' still has {} live instance(s)",
                name, count
            )));
        }
        self.registry.delete_object_type(name)?;
        self.relational.delete_meta(MetaTable::ObjectTypes, name).await?;
        Ok(())
    }

    // ---- Schema: relation types -------------------------------------------------

    #[instrument(skip(self, def))]
    pub async fn create_relation_type(&self, def: RelationTypeDefinition) -> Result<()> {
        let name = def.name.clone();
        let persisted = serde_json::to_value(&def).expect("relation type definition always serializes");
        self.registry.create_relation_type(def)?;
        if let Err(err) = self.relational.put_meta(MetaTable::RelationTypes, &name, persisted).await {
            let _ = self.registry.delete_relation_type(&name);
            return Err(err.into());
        }
        Ok(())
    }

    pub fn get_relation_type(&self, name: &str) -> Option<RelationTypeDefinition> {
        self.registry.get_relation_type(name)
    }

    pub fn list_relation_types(&self) -> Vec<RelationTypeDefinition> {
        self.registry.list_relation_types()
    }

    #[instrument(skip(self))]
    pub async fn delete_relation_type(&self, name: &str) -> Result<()> {
        let existing = self
            .relational
            .find_relations(RelationQuery {
                relation_type: Some(name.to_string()),
                limit: Some(1),
                ..Default::default()
            })
            .await?;
        if !existing.is_empty() {
            return Err(GrizabellaError::SchemaConflict(format!(
                "relation type '{}' still has live instances",
                name
            )));
        }
        self.registry.delete_relation_type(name)?;
        self.relational.delete_meta(MetaTable::RelationTypes, name).await?;
        Ok(())
    }

    // ---- Schema: embedding definitions -----------------------------------------

    /// Register an embedding definition and synchronously backfill vectors
    /// for every existing instance of its object type.
    /// Backfill failures don't undo the registration: affected objects are
    /// re-embedded on their next touch.
    #[instrument(skip(self, def))]
    pub async fn create_embedding_definition(&self, def: EmbeddingDefinition) -> Result<()> {
        let name = def.name.clone();
        let object_type = def.object_type_name.clone();
        let persisted = serde_json::to_value(&def).expect("embedding definition always serializes");
        self.registry.create_embedding_definition(def)?;
        if let Err(err) = self.relational.put_meta(MetaTable::EmbeddingDefinitions, &name, persisted).await {
            let _ = self.registry.delete_embedding_definition(&name);
            return Err(err.into());
        }

        match self.backfill_embeddings(&object_type, &name).await {
            Ok(embedded) if embedded > 0 => {
                tracing::info!(definition = %name, embedded, "backfilled embeddings for new definition");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(definition = %name, error = %err, "embedding backfill incomplete");
            }
        }
        Ok(())
    }

    pub fn get_embedding_definition(&self, name: &str) -> Option<EmbeddingDefinition> {
        self.registry.get_embedding_definition(name)
    }

    pub fn list_embedding_definitions(&self) -> Vec<EmbeddingDefinition> {
        self.registry.list_embedding_definitions()
    }

    #[instrument(skip(self))]
    pub async fn delete_embedding_definition(&self, name: &str) -> Result<()> {
        self.registry.delete_embedding_definition(name)?;
        self.relational.delete_meta(MetaTable::EmbeddingDefinitions, name).await?;
        Ok(())
    }

    /// Re-embed every object of `object_type_name` missing a vector for
    /// `embedding_definition_name`.
    pub async fn backfill_embeddings(&self, object_type_name: &str, embedding_definition_name: &str) -> Result<usize> {
        self.embeddings
            .backfill(
                self.relational.as_ref(),
                object_type_name,
                embedding_definition_name,
                self.backfill_batch_size,
            )
            .await
    }

    // ---- Instances --------------------------------------------------------------

    pub async fn upsert_object(
        &self,
        type_name: &str,
        id: Option<Uuid>,
        properties: HashMap<String, PropertyValue>,
        weight: Option<f64>,
    ) -> Result<ObjectInstance> {
        self.with_retry(|| self.write.upsert_object(type_name, id, properties.clone(), weight))
            .await
    }

    pub async fn get_object_by_id(&self, type_name: &str, id: Uuid) -> Result<Option<ObjectInstance>> {
        self.with_retry(|| async { self.relational.get_object(type_name, id).await.map_err(GrizabellaError::from) })
            .await
    }

    pub async fn delete_object(&self, type_name: &str, id: Uuid) -> Result<bool> {
        self.with_retry(|| self.write.delete_object(type_name, id)).await
    }

    pub async fn find_objects(
        &self,
        type_name: &str,
        filters: &[RelFilter],
        limit: Option<usize>,
    ) -> Result<Vec<ObjectInstance>> {
        self.with_retry(|| async {
            self.relational.find_objects(type_name, filters, limit).await.map_err(GrizabellaError::from)
        })
        .await
    }

    // ---- Relations ----------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub async fn add_relation(
        &self,
        relation_type: &str,
        source_type: &str,
        source_id: Uuid,
        target_type: &str,
        target_id: Uuid,
        properties: HashMap<String, PropertyValue>,
        weight: Option<f64>,
    ) -> Result<RelationInstance> {
        self.with_retry(|| {
            self.write.upsert_relation(
                relation_type,
                None,
                source_type,
                source_id,
                target_type,
                target_id,
                properties.clone(),
                weight,
            )
        })
        .await
    }

    pub async fn get_relation(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        relation_type: &str,
    ) -> Result<Vec<RelationInstance>> {
        self.query_relations(RelationQuery {
            relation_type: Some(relation_type.to_string()),
            source_id: Some(source_id),
            target_id: Some(target_id),
            ..Default::default()
        })
        .await
    }

    pub async fn delete_relation(&self, relation_type: &str, id: Uuid) -> Result<bool> {
        self.with_retry(|| self.write.delete_relation(relation_type, id)).await
    }

    pub async fn get_outgoing_relations(
        &self,
        id: Uuid,
        relation_type: Option<&str>,
    ) -> Result<Vec<RelationInstance>> {
        self.query_relations(RelationQuery {
            relation_type: relation_type.map(str::to_string),
            source_id: Some(id),
            ..Default::default()
        })
        .await
    }

    pub async fn get_incoming_relations(
        &self,
        id: Uuid,
        relation_type: Option<&str>,
    ) -> Result<Vec<RelationInstance>> {
        self.query_relations(RelationQuery {
            relation_type: relation_type.map(str::to_string),
            target_id: Some(id),
            ..Default::default()
        })
        .await
    }

    pub async fn query_relations(&self, query: RelationQuery) -> Result<Vec<RelationInstance>> {
        self.with_retry(|| async { self.relational.find_relations(query.clone()).await.map_err(GrizabellaError::from) })
            .await
    }

    // ---- Queries --------------------------------------------------------------------

    pub async fn get_embedding_vector_for_text(&self, text: &str, embedding_def_name: &str) -> Result<Vec<f32>> {
        let def = self.registry.get_embedding_definition(embedding_def_name).ok_or_else(|| {
            GrizabellaError::NotFound(format!("embedding definition '{}' does not exist", embedding_def_name))
        })?;
        self.embeddings.embed_text(&def.embedding_model_id, text).await
    }

    /// Find objects whose embedding vectors are closest to `object_id`'s
    /// own, across every embedding definition declared on its type (or the
    /// subset named in `search_properties`).
    pub async fn search_similar_objects(
        &self,
        object_id: Uuid,
        object_type: &str,
        n: usize,
        search_properties: Option<&[String]>,
    ) -> Result<Vec<(ObjectInstance, f32)>> {
        let anchor = self
            .get_object_by_id(object_type, object_id)
            .await?
            .ok_or_else(|| GrizabellaError::NotFound(format!("object '{}' does not exist", object_id)))?;

        let mut definitions = self.registry.list_embedding_definitions_for_type(object_type);
        if let Some(props) = search_properties {
            definitions.retain(|d| props.iter().any(|p| p == &d.source_property_name));
        }

        let mut best: HashMap<Uuid, f32> = HashMap::new();
        for definition in definitions {
            let Some(PropertyValue::Text(text)) = anchor.property(&definition.source_property_name) else {
                continue;
            };
            let vector = self.embeddings.embed_text(&definition.embedding_model_id, text).await?;
            let scored = self
                .with_retry(|| async {
                    self.vector.search(&definition.name, &vector, n + 1, None, false).await.map_err(GrizabellaError::from)
                })
                .await?;
            for (id, score) in scored {
                if id == object_id {
                    continue;
                }
                best.entry(id).and_modify(|existing| *existing = existing.max(score)).or_insert(score);
            }
        }

        let mut ranked: Vec<(Uuid, f32)> = best.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);

        let mut out = Vec::with_capacity(ranked.len());
        for (id, score) in ranked {
            if let Some(object) = self.relational.get_object(object_type, id).await? {
                out.push((object, score));
            }
        }
        Ok(out)
    }

    /// Embed `query_text` with the model behind `embedding_def_name`, then
    /// return the closest stored objects, optionally filtered by
    /// relational predicates on the result rows.
    pub async fn find_similar(
        &self,
        embedding_def_name: &str,
        query_text: &str,
        limit: usize,
        filter: Option<&[RelFilter]>,
    ) -> Result<Vec<(ObjectInstance, f32)>> {
        let definition = self.registry.get_embedding_definition(embedding_def_name).ok_or_else(|| {
            GrizabellaError::NotFound(format!("embedding definition '{}' does not exist", embedding_def_name))
        })?;
        let vector = self.get_embedding_vector_for_text(query_text, embedding_def_name).await?;
        let scored = self
            .with_retry(|| async {
                self.vector.search(embedding_def_name, &vector, limit, None, false).await.map_err(GrizabellaError::from)
            })
            .await?;

        let mut out = Vec::with_capacity(scored.len());
        for (id, score) in scored {
            let Some(object) = self.relational.get_object(&definition.object_type_name, id).await? else {
                continue;
            };
            if let Some(filters) = filter {
                if !filters.iter().all(|f| f.matches(object.property(&f.property))) {
                    continue;
                }
            }
            out.push((object, score));
        }
        Ok(out)
    }

    /// Plan and evaluate a boolean query tree across the relational,
    /// vector, and graph stores. `timeout` bounds execution;
    /// exceeding it yields a partial, `cancelled` result.
    pub async fn execute_complex_query(&self, query: &Query, timeout: Option<Duration>) -> Result<QueryResult> {
        let plan = Planner::new(&self.registry).plan(query)?;
        let deadline = timeout.map(|d| Instant::now() + d);
        let executor = Executor::new(self.relational.clone(), self.vector.clone(), self.graph.clone(), deadline);
        executor.execute(&plan).await
    }

    // ---- Health ---------------------------------------------------------------------

    /// The `_coherence_repair` ledger: cross-store divergences awaiting
    /// background fix-up.
    pub async fn pending_repairs(&self) -> Result<Vec<crate::write::CoherenceRepairEntry>> {
        self.write.list_repairs().await
    }
}

/// Rehydrate the registry from the reserved metadata region.
/// Rows that no longer parse are skipped with a warning rather than
/// blocking startup.
async fn load_persisted_schema(registry: &Registry, relational: &dyn RelationalAdapter) -> Result<()> {
    for (key, value) in relational.list_meta(MetaTable::ObjectTypes).await? {
        match serde_json::from_value::<ObjectTypeDefinition>(value) {
            Ok(def) => {
                let _ = registry.create_object_type(def);
            }
            Err(err) => tracing::warn!(%key, error = %err, "skipping unreadable persisted object type"),
        }
    }
    for (key, value) in relational.list_meta(MetaTable::RelationTypes).await? {
        match serde_json::from_value::<RelationTypeDefinition>(value) {
            Ok(def) => {
                let _ = registry.create_relation_type(def);
            }
            Err(err) => tracing::warn!(%key, error = %err, "skipping unreadable persisted relation type"),
        }
    }
    for (key, value) in relational.list_meta(MetaTable::EmbeddingDefinitions).await? {
        match serde_json::from_value::<EmbeddingDefinition>(value) {
            Ok(def) => {
                let _ = registry.create_embedding_definition(def);
            }
            Err(err) => tracing::warn!(%key, error = %err, "skipping unreadable persisted embedding definition"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Operator;
    use crate::query::{Clause, Component};
    use crate::types::{PropertyDataType, PropertyDefinition};

    async fn paper_author_engine() -> Grizabella {
        let engine = Grizabella::testing().await.unwrap();
        engine
            .create_object_type(ObjectTypeDefinition::new(
                "Paper",
                vec![
                    PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                    PropertyDefinition::new("title", PropertyDataType::Text),
                    PropertyDefinition::new("year", PropertyDataType::Integer),
                ],
            ))
            .await
            .unwrap();
        engine
            .create_object_type(ObjectTypeDefinition::new(
                "Author",
                vec![PropertyDefinition::new("name", PropertyDataType::Text)],
            ))
            .await
            .unwrap();
        engine
            .create_relation_type(RelationTypeDefinition::new(
                "authored_by",
                vec!["Paper".into()],
                vec!["Author".into()],
            ))
            .await
            .unwrap();
        engine
            .create_embedding_definition(EmbeddingDefinition::new(
                "paper_title_embed",
                "Paper",
                "title",
                "reference-hash-embedder",
            ))
            .await
            .unwrap();
        engine
    }

    // Write then read back an object, type-validated.
    #[tokio::test]
    async fn upsert_then_get_object() {
        let engine = paper_author_engine().await;
        let mut props = HashMap::new();
        props.insert("title".to_string(), PropertyValue::Text("Graphs".into()));
        props.insert("year".to_string(), PropertyValue::Integer(2020));
        let stored = engine.upsert_object("Paper", None, props, None).await.unwrap();
        let fetched = engine.get_object_by_id("Paper", stored.id()).await.unwrap();
        assert_eq!(fetched.unwrap().id(), stored.id());
    }

    // A relation between two real objects is queryable from both ends.
    #[tokio::test]
    async fn relation_visible_from_both_endpoints() {
        let engine = paper_author_engine().await;
        let mut paper_props = HashMap::new();
        paper_props.insert("title".to_string(), PropertyValue::Text("Graphs".into()));
        paper_props.insert("year".to_string(), PropertyValue::Integer(2020));
        let paper = engine.upsert_object("Paper", None, paper_props, None).await.unwrap();

        let mut author_props = HashMap::new();
        author_props.insert("name".to_string(), PropertyValue::Text("Ada".into()));
        let author = engine.upsert_object("Author", None, author_props, None).await.unwrap();

        engine
            .add_relation("authored_by", "Paper", paper.id(), "Author", author.id(), HashMap::new(), None)
            .await
            .unwrap();

        let outgoing = engine.get_outgoing_relations(paper.id(), Some("authored_by")).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        let incoming = engine.get_incoming_relations(author.id(), Some("authored_by")).await.unwrap();
        assert_eq!(incoming.len(), 1);
    }

    // Deleting an object type with live instances is rejected.
    #[tokio::test]
    async fn delete_object_type_blocked_by_live_instances() {
        let engine = paper_author_engine().await;
        let mut props = HashMap::new();
        props.insert("title".to_string(), PropertyValue::Text("Graphs".into()));
        props.insert("year".to_string(), PropertyValue::Integer(2020));
        engine.upsert_object("Paper", None, props, None).await.unwrap();
        let err = engine.delete_object_type("Paper").await.unwrap_err();
        assert!(matches!(err, GrizabellaError::SchemaConflict(_)));
    }

    // find_similar surfaces a semantically-embedded object by text query.
    #[tokio::test]
    async fn find_similar_returns_embedded_object() {
        let engine = paper_author_engine().await;
        let mut props = HashMap::new();
        props.insert("title".to_string(), PropertyValue::Text("Graph Theory Basics".into()));
        props.insert("year".to_string(), PropertyValue::Integer(2020));
        let stored = engine.upsert_object("Paper", None, props, None).await.unwrap();

        let results = engine
            .find_similar("paper_title_embed", "Graph Theory Basics", 5, None)
            .await
            .unwrap();
        assert!(results.iter().any(|(o, _)| o.id() == stored.id()));
    }

    // execute_complex_query applies relational filters through the planner/executor.
    #[tokio::test]
    async fn complex_query_filters_by_year() {
        let engine = paper_author_engine().await;
        for (title, year) in [("Old Paper", 2005), ("New Paper", 2023)] {
            let mut props = HashMap::new();
            props.insert("title".to_string(), PropertyValue::Text(title.into()));
            props.insert("year".to_string(), PropertyValue::Integer(year));
            engine.upsert_object("Paper", None, props, None).await.unwrap();
        }

        let query = Query::from_components(vec![Component::new("Paper")
            .with_filter(RelFilter::new("year", Operator::Gt, PropertyValue::Integer(2010)))]);
        let result = engine.execute_complex_query(&query, None).await.unwrap();
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].property("title"), Some(&PropertyValue::Text("New Paper".into())));
    }

    // Deleting an object cascades its relation and embedding.
    #[tokio::test]
    async fn delete_object_removes_vector_and_allows_type_deletion() {
        let engine = paper_author_engine().await;
        let mut props = HashMap::new();
        props.insert("title".to_string(), PropertyValue::Text("Graphs".into()));
        props.insert("year".to_string(), PropertyValue::Integer(2020));
        let stored = engine.upsert_object("Paper", None, props, None).await.unwrap();

        assert!(engine.delete_object("Paper", stored.id()).await.unwrap());
        assert!(engine.delete_object_type("Paper").await.is_ok());
    }

    // Schema definitions persisted in the metadata region are rehydrated
    // into a fresh registry at open.
    #[tokio::test]
    async fn open_rehydrates_schema_from_metadata_region() {
        let relational = InMemoryRelational::new();
        let def = ObjectTypeDefinition::new(
            "Paper",
            vec![PropertyDefinition::new("title", PropertyDataType::Text)],
        );
        relational
            .put_meta(MetaTable::ObjectTypes, "Paper", serde_json::to_value(&def).unwrap())
            .await
            .unwrap();

        let registry = Registry::new();
        load_persisted_schema(&registry, &relational).await.unwrap();
        assert_eq!(registry.get_object_type("Paper"), Some(def));
    }

    // A free-standing Not is rejected with a QueryError before execution.
    #[tokio::test]
    async fn complex_query_rejects_freestanding_not() {
        let engine = paper_author_engine().await;
        let query = Query::new(Clause::not(Component::new("Paper").into()));
        let err = engine.execute_complex_query(&query, None).await.unwrap_err();
        assert!(matches!(err, GrizabellaError::Query(_)));
    }

    // Boolean algebra: `Or(And(year==2023, published_in→venue_1),
    // And(year==2022, Not(authored_by→carol)))` over a small publications
    // seed returns `{ paper_1, paper_2, paper_3 }`.
    #[tokio::test]
    async fn complex_query_s7_boolean_algebra() {
        use crate::adapters::Direction;
        use crate::query::GraphHop;

        let engine = Grizabella::testing().await.unwrap();
        engine
            .create_object_type(ObjectTypeDefinition::new(
                "Paper",
                vec![
                    PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                    PropertyDefinition::new("title", PropertyDataType::Text),
                    PropertyDefinition::new("year", PropertyDataType::Integer),
                ],
            ))
            .await
            .unwrap();
        engine
            .create_object_type(ObjectTypeDefinition::new(
                "Author",
                vec![
                    PropertyDefinition::new("name", PropertyDataType::Text),
                    PropertyDefinition::new("birth_year", PropertyDataType::Integer),
                ],
            ))
            .await
            .unwrap();
        engine
            .create_object_type(ObjectTypeDefinition::new(
                "Venue",
                vec![PropertyDefinition::new("name", PropertyDataType::Text)],
            ))
            .await
            .unwrap();
        engine
            .create_relation_type(RelationTypeDefinition::new(
                "authored_by",
                vec!["Paper".into()],
                vec!["Author".into()],
            ))
            .await
            .unwrap();
        engine
            .create_relation_type(RelationTypeDefinition::new(
                "published_in",
                vec!["Paper".into()],
                vec!["Venue".into()],
            ))
            .await
            .unwrap();

        async fn author(engine: &Grizabella, name: &str, birth_year: i64) -> crate::types::ObjectInstance {
            let mut props = HashMap::new();
            props.insert("name".to_string(), PropertyValue::Text(name.into()));
            props.insert("birth_year".to_string(), PropertyValue::Integer(birth_year));
            engine.upsert_object("Author", None, props, None).await.unwrap()
        }
        async fn venue(engine: &Grizabella, name: &str) -> crate::types::ObjectInstance {
            let mut props = HashMap::new();
            props.insert("name".to_string(), PropertyValue::Text(name.into()));
            engine.upsert_object("Venue", None, props, None).await.unwrap()
        }
        async fn paper(engine: &Grizabella, title: &str, year: i64) -> crate::types::ObjectInstance {
            let mut props = HashMap::new();
            props.insert("title".to_string(), PropertyValue::Text(title.into()));
            props.insert("year".to_string(), PropertyValue::Integer(year));
            engine.upsert_object("Paper", None, props, None).await.unwrap()
        }

        let alice = author(&engine, "Alice", 1980).await;
        let carol = author(&engine, "Carol", 1985).await;
        let venue_1 = venue(&engine, "JFA").await;

        let paper_1 = paper(&engine, "paper_1", 2023).await;
        let paper_2 = paper(&engine, "paper_2", 2022).await;
        let paper_3 = paper(&engine, "paper_3", 2023).await;
        let paper_4 = paper(&engine, "paper_4", 2010).await;

        engine
            .add_relation("published_in", "Paper", paper_1.id(), "Venue", venue_1.id(), HashMap::new(), None)
            .await
            .unwrap();
        engine
            .add_relation("published_in", "Paper", paper_3.id(), "Venue", venue_1.id(), HashMap::new(), None)
            .await
            .unwrap();
        engine
            .add_relation("authored_by", "Paper", paper_2.id(), "Author", alice.id(), HashMap::new(), None)
            .await
            .unwrap();
        engine
            .add_relation("authored_by", "Paper", paper_4.id(), "Author", carol.id(), HashMap::new(), None)
            .await
            .unwrap();

        let published_in_venue_1 = Component::new("Paper")
            .with_graph_hop(GraphHop::new("published_in", Direction::Outgoing, "Venue").with_target_id(venue_1.id()));
        let authored_by_carol = Component::new("Paper")
            .with_graph_hop(GraphHop::new("authored_by", Direction::Outgoing, "Author").with_target_id(carol.id()));

        let left = Clause::and(vec![
            Component::new("Paper").with_filter(RelFilter::new("year", Operator::Eq, PropertyValue::Integer(2023))).into(),
            published_in_venue_1.into(),
        ]);
        let right = Clause::and(vec![
            Component::new("Paper").with_filter(RelFilter::new("year", Operator::Eq, PropertyValue::Integer(2022))).into(),
            Clause::not(authored_by_carol.into()),
        ]);
        let query = Query::new(Clause::or(vec![left, right]));

        let result = engine.execute_complex_query(&query, None).await.unwrap();
        let ids: std::collections::HashSet<_> = result.instances.iter().map(|o| o.id()).collect();
        assert_eq!(ids, [paper_1.id(), paper_2.id(), paper_3.id()].into_iter().collect());
    }
}
