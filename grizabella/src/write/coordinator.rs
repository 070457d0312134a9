//! The Write Coordinator: orders writes across the relational,
//! graph, and vector stores, and records a `_coherence_repair` entry when
//! a non-authoritative store can't be kept in sync.

use super::lock::StripedLock;
use crate::adapters::{GraphAdapter, MetaTable, RelationQuery, RelationalAdapter};
use crate::embedding::EmbeddingCoordinator;
use crate::error::{GrizabellaError, Result};
use crate::schema::Registry;
use crate::types::{MemoryInstance, ObjectInstance, PropertyDataType, PropertyValue, RelationInstance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// A `_coherence_repair` ledger row: the relational write succeeded but one
/// or more other stores diverged from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceRepairEntry {
    pub repair_id: Uuid,
    pub type_name: String,
    pub instance_id: Uuid,
    pub operation: String,
    pub stores_diverged: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct WriteCoordinator {
    registry: Arc<Registry>,
    relational: Arc<dyn RelationalAdapter>,
    graph: Arc<dyn GraphAdapter>,
    embeddings: Arc<EmbeddingCoordinator>,
    locks: StripedLock,
}

impl WriteCoordinator {
    pub fn new(
        registry: Arc<Registry>,
        relational: Arc<dyn RelationalAdapter>,
        graph: Arc<dyn GraphAdapter>,
        embeddings: Arc<EmbeddingCoordinator>,
    ) -> Self {
        Self {
            registry,
            relational,
            graph,
            embeddings,
            locks: StripedLock::new(),
        }
    }

    async fn record_repair(
        &self,
        type_name: &str,
        instance_id: Uuid,
        operation: &str,
        stores_diverged: Vec<String>,
    ) -> Uuid {
        let repair_id = Uuid::new_v4();
        let entry = CoherenceRepairEntry {
            repair_id,
            type_name: type_name.to_string(),
            instance_id,
            operation: operation.to_string(),
            stores_diverged,
            created_at: Utc::now(),
        };
        if let Err(err) = self
            .relational
            .put_meta(
                MetaTable::CoherenceRepair,
                &repair_id.to_string(),
                serde_json::to_value(&entry).expect("coherence repair entry always serializes"),
            )
            .await
        {
            warn!(error = %err, %repair_id, "failed to persist coherence repair entry");
        }
        repair_id
    }

    pub async fn list_repairs(&self) -> Result<Vec<CoherenceRepairEntry>> {
        let rows = self.relational.list_meta(MetaTable::CoherenceRepair).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(_, value)| serde_json::from_value(value).ok())
            .collect())
    }

    /// Insert or update an object by type and optional id. Returns the
    /// stored row with its assigned id and refreshed `upsert_date`.
    pub async fn upsert_object(
        &self,
        type_name: &str,
        id: Option<Uuid>,
        properties: HashMap<String, PropertyValue>,
        weight: Option<f64>,
    ) -> Result<ObjectInstance> {
        let object_type = self
            .registry
            .get_object_type(type_name)
            .ok_or_else(|| GrizabellaError::Validation(format!("unknown object type '{}'", type_name)))?;

        let id = id.unwrap_or_else(Uuid::new_v4);
        let _guard = self.locks.lock(id).await;

        let previous = self.relational.get_object(type_name, id).await?;
        let weight = weight
            .or_else(|| previous.as_ref().map(|p| p.base.weight))
            .unwrap_or(crate::types::DEFAULT_WEIGHT);
        MemoryInstance::validate_weight(weight).map_err(GrizabellaError::Validation)?;

        // A declared UUID primary key mirrors the record id: filled in when
        // absent, rejected when it disagrees.
        let mut properties = properties;
        if let Some(pk) = object_type.primary_key() {
            if pk.data_type == PropertyDataType::Uuid {
                match properties.get(&pk.name) {
                    None => {
                        properties.insert(pk.name.clone(), PropertyValue::Uuid(id));
                    }
                    Some(PropertyValue::Uuid(supplied)) if *supplied != id => {
                        return Err(GrizabellaError::Validation(format!(
                            "primary key property '{}' ({}) does not match the record id {}",
                            pk.name, supplied, id
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        let object = ObjectInstance {
            base: MemoryInstance {
                id,
                weight,
                upsert_date: Utc::now(),
            },
            object_type_name: type_name.to_string(),
            properties,
        };
        self.registry.validate_object_instance(&object)?;

        for prop in object_type.properties.iter().filter(|p| p.is_unique) {
            if let Some(value) = object.property(&prop.name) {
                if self
                    .relational
                    .object_property_taken(type_name, &prop.name, value, Some(id))
                    .await?
                {
                    return Err(GrizabellaError::Validation(format!(
                        "value for unique property '{}' on '{}' is already in use",
                        prop.name, type_name
                    )));
                }
            }
        }

        self.relational.upsert_object(type_name, object.clone()).await?;

        if let Err(graph_err) = self.graph.upsert_node(type_name, id).await {
            warn!(error = %graph_err, %id, "graph node upsert failed, compensating relational write");
            let compensation = match previous {
                Some(prior) => self.relational.upsert_object(type_name, prior).await,
                None => self.relational.delete_object(type_name, id).await.map(|_| ()),
            };
            return match compensation {
                Ok(()) => Err(graph_err.into()),
                Err(comp_err) => {
                    warn!(error = %comp_err, %id, "compensating relational write also failed");
                    let repair_id = self
                        .record_repair(type_name, id, "upsert_object", vec!["graph".to_string()])
                        .await;
                    Err(GrizabellaError::PartialWrite {
                        stores_diverged: vec!["graph".to_string()],
                        repair_id,
                    })
                }
            };
        }

        // Embedding failures never roll the object write back: the vector
        // is recorded as missing and recomputed on the next touch.
        if let Err(err) = self.embeddings.on_object_upserted(&object, previous.as_ref()).await {
            warn!(error = %err, %id, "embedding sync failed, vector left missing");
            self.record_repair(type_name, id, "upsert_object", vec!["vector".to_string()])
                .await;
        }

        Ok(object)
    }

    /// Remove an object from every store it participates in. Deletes in
    /// the reverse order of `upsert_object`: relations referencing the
    /// object, then embeddings and graph edges, before the authoritative
    /// relational row.
    pub async fn delete_object(&self, type_name: &str, id: Uuid) -> Result<bool> {
        let _guard = self.locks.lock(id).await;
        let existing = self.relational.get_object(type_name, id).await?;
        let Some(_existing) = existing else {
            return Ok(false);
        };

        let mut referencing = self
            .relational
            .find_relations(RelationQuery {
                source_id: Some(id),
                ..Default::default()
            })
            .await?;
        referencing.extend(
            self.relational
                .find_relations(RelationQuery {
                    target_id: Some(id),
                    ..Default::default()
                })
                .await?,
        );
        // The cascade runs under the object's stripe guard only: taking the
        // relation's stripe here could self-deadlock when both ids hash to
        // the same stripe.
        for relation in referencing {
            self.delete_relation_unlocked(&relation.relation_type_name, relation.id()).await?;
        }

        let mut diverged = Vec::new();
        if let Err(err) = self.embeddings.on_object_deleted(type_name, id).await {
            warn!(error = %err, %id, "embedding cleanup diverged during delete");
            diverged.push("vector".to_string());
        }
        if let Err(err) = self.graph.delete_node(type_name, id).await {
            warn!(error = %err, %id, "graph node delete diverged during delete");
            diverged.push("graph".to_string());
        }

        let removed = self.relational.delete_object(type_name, id).await?;

        if !diverged.is_empty() {
            self.record_repair(type_name, id, "delete_object", diverged).await;
        }
        Ok(removed)
    }

    /// Insert or update a relation. `source_type`/`target_type` are the
    /// endpoint object types the caller already resolved (engine layer),
    /// used both for schema validation and to address the graph edge.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_relation(
        &self,
        relation_type: &str,
        id: Option<Uuid>,
        source_type: &str,
        source_id: Uuid,
        target_type: &str,
        target_id: Uuid,
        properties: HashMap<String, PropertyValue>,
        weight: Option<f64>,
    ) -> Result<RelationInstance> {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let _guard = self.locks.lock(id).await;

        if self.relational.get_object(source_type, source_id).await?.is_none() {
            return Err(GrizabellaError::NotFound(format!(
                "source object '{}' of type '{}' does not exist",
                source_id, source_type
            )));
        }
        if self.relational.get_object(target_type, target_id).await?.is_none() {
            return Err(GrizabellaError::NotFound(format!(
                "target object '{}' of type '{}' does not exist",
                target_id, target_type
            )));
        }

        let previous = self.relational.get_relation(relation_type, id).await?;
        let weight = weight
            .or_else(|| previous.as_ref().map(|p| p.base.weight))
            .unwrap_or(crate::types::DEFAULT_WEIGHT);
        MemoryInstance::validate_weight(weight).map_err(GrizabellaError::Validation)?;

        let relation = RelationInstance {
            base: MemoryInstance {
                id,
                weight,
                upsert_date: Utc::now(),
            },
            relation_type_name: relation_type.to_string(),
            source_id,
            target_id,
            properties,
        };
        self.registry
            .validate_relation_instance(&relation, source_type, target_type)?;

        self.relational.upsert_relation(relation_type, relation.clone()).await?;

        if let Err(graph_err) = self
            .graph
            .upsert_edge(
                relation_type,
                id,
                (source_type.to_string(), source_id),
                (target_type.to_string(), target_id),
            )
            .await
        {
            warn!(error = %graph_err, %id, "graph edge upsert failed, compensating relational write");
            let compensation = match previous {
                Some(prior) => self.relational.upsert_relation(relation_type, prior).await,
                None => self.relational.delete_relation(relation_type, id).await.map(|_| ()),
            };
            return match compensation {
                Ok(()) => Err(graph_err.into()),
                Err(comp_err) => {
                    warn!(error = %comp_err, %id, "compensating relational write also failed");
                    let repair_id = self
                        .record_repair(relation_type, id, "upsert_relation", vec!["graph".to_string()])
                        .await;
                    Err(GrizabellaError::PartialWrite {
                        stores_diverged: vec!["graph".to_string()],
                        repair_id,
                    })
                }
            };
        }

        Ok(relation)
    }

    pub async fn delete_relation(&self, relation_type: &str, id: Uuid) -> Result<bool> {
        let _guard = self.locks.lock(id).await;
        self.delete_relation_unlocked(relation_type, id).await
    }

    async fn delete_relation_unlocked(&self, relation_type: &str, id: Uuid) -> Result<bool> {
        if self.relational.get_relation(relation_type, id).await?.is_none() {
            return Ok(false);
        }

        let mut diverged = Vec::new();
        if let Err(err) = self.graph.delete_edge(relation_type, id).await {
            warn!(error = %err, %id, "graph edge delete diverged during delete");
            diverged.push("graph".to_string());
        }

        let removed = self.relational.delete_relation(relation_type, id).await?;

        if !diverged.is_empty() {
            self.record_repair(relation_type, id, "delete_relation", diverged).await;
        }
        Ok(removed)
    }
}
