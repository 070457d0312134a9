//! The Embedding Coordinator: keeps each object's embeddable
//! properties in sync with the vector store, skipping re-embedding when
//! the source text hasn't changed.

use super::embedder::Embedder;
use crate::adapters::{RelationalAdapter, VectorAdapter};
use crate::error::{GrizabellaError, Result};
use crate::schema::Registry;
use crate::types::{ObjectInstance, PropertyValue};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// What happened to one embedding definition during a sync pass.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutcome {
    /// Source text changed (or the vector didn't exist yet) and was
    /// re-embedded.
    Embedded { definition: String },
    /// Source text was unchanged; the existing vector was left alone.
    Skipped { definition: String },
    /// The source property was null; any existing vector was removed.
    Cleared { definition: String },
}

#[derive(Debug)]
pub struct EmbeddingCoordinator {
    registry: Arc<Registry>,
    vector: Arc<dyn VectorAdapter>,
    embedders: HashMap<String, Arc<dyn Embedder>>,
    preview_truncate_bytes: usize,
}

impl EmbeddingCoordinator {
    pub fn new(
        registry: Arc<Registry>,
        vector: Arc<dyn VectorAdapter>,
        embedders: Vec<Arc<dyn Embedder>>,
        preview_truncate_bytes: usize,
    ) -> Self {
        let embedders = embedders
            .into_iter()
            .map(|e| (e.model_id().to_string(), e))
            .collect();
        Self {
            registry,
            vector,
            embedders,
            preview_truncate_bytes,
        }
    }

    fn embedder_for(&self, model_id: &str) -> Result<&Arc<dyn Embedder>> {
        self.embedders
            .get(model_id)
            .ok_or_else(|| GrizabellaError::Embedding(format!("no embedder registered for model '{}'", model_id)))
    }

    /// Embed arbitrary text with a named model, independent of any stored
    /// object — the primitive behind `get_embedding_vector_for_text`.
    pub async fn embed_text(&self, model_id: &str, text: &str) -> Result<Vec<f32>> {
        let embedder = self.embedder_for(model_id)?;
        embedder.embed(text).await.map_err(|e| GrizabellaError::Embedding(e.to_string()))
    }

    fn preview(&self, text: &str) -> String {
        if text.len() <= self.preview_truncate_bytes {
            text.to_string()
        } else {
            let mut end = self.preview_truncate_bytes;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}…", &text[..end])
        }
    }

    /// Sync every embedding definition declared on `object`'s type after an
    /// upsert. `previous` is the prior row, if this was an update, used for
    /// the change-detection shortcut.
    pub async fn on_object_upserted(
        &self,
        object: &ObjectInstance,
        previous: Option<&ObjectInstance>,
    ) -> Result<Vec<EmbeddingOutcome>> {
        let definitions = self
            .registry
            .list_embedding_definitions_for_type(&object.object_type_name);
        let mut outcomes = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let current_text = match object.property(&definition.source_property_name) {
                Some(PropertyValue::Text(s)) => Some(s.clone()),
                Some(PropertyValue::Null) | None => None,
                Some(_) => {
                    return Err(GrizabellaError::Validation(format!(
                        "embedding definition '{}' source property must be TEXT",
                        definition.name
                    )))
                }
            };

            let Some(text) = current_text else {
                self.vector.delete(&definition.name, object.id()).await?;
                outcomes.push(EmbeddingOutcome::Cleared {
                    definition: definition.name.clone(),
                });
                continue;
            };

            let previous_text = previous.and_then(|p| match p.property(&definition.source_property_name) {
                Some(PropertyValue::Text(s)) => Some(s.as_str()),
                _ => None,
            });
            let unchanged = previous_text == Some(text.as_str())
                && self.vector.has_vector(&definition.name, object.id()).await?;
            if unchanged {
                outcomes.push(EmbeddingOutcome::Skipped {
                    definition: definition.name.clone(),
                });
                continue;
            }

            let embedder = self.embedder_for(&definition.embedding_model_id)?;
            if let Some(expected) = definition.dimensions {
                if expected != embedder.dimensions() {
                    return Err(GrizabellaError::Embedding(format!(
                        "embedding definition '{}' declares {} dimensions but model '{}' produces {}",
                        definition.name,
                        expected,
                        embedder.model_id(),
                        embedder.dimensions()
                    )));
                }
            }
            let vector = embedder
                .embed(&text)
                .await
                .map_err(|e| GrizabellaError::Embedding(e.to_string()))?;
            self.vector
                .ensure_collection(&definition.name, embedder.dimensions())
                .await?;
            self.vector
                .upsert(&definition.name, object.id(), vector, Some(self.preview(&text)))
                .await?;
            outcomes.push(EmbeddingOutcome::Embedded {
                definition: definition.name.clone(),
            });
        }
        Ok(outcomes)
    }

    pub async fn on_object_deleted(&self, object_type_name: &str, id: Uuid) -> Result<()> {
        for definition in self.registry.list_embedding_definitions_for_type(object_type_name) {
            self.vector.delete(&definition.name, id).await?;
        }
        Ok(())
    }

    /// Re-embed every object of `object_type_name` missing a vector for
    /// `embedding_definition_name`. Returns the number embedded.
    pub async fn backfill(
        &self,
        relational: &dyn RelationalAdapter,
        object_type_name: &str,
        embedding_definition_name: &str,
        batch_size: usize,
    ) -> Result<usize> {
        let definition = self
            .registry
            .get_embedding_definition(embedding_definition_name)
            .ok_or_else(|| {
                GrizabellaError::NotFound(format!(
                    "embedding definition '{}' does not exist",
                    embedding_definition_name
                ))
            })?;
        if definition.object_type_name != object_type_name {
            return Err(GrizabellaError::Validation(format!(
                "embedding definition '{}' does not belong to object type '{}'",
                embedding_definition_name, object_type_name
            )));
        }

        let objects = relational.find_objects(object_type_name, &[], None).await?;
        let mut embedded = 0;
        for chunk in objects.chunks(batch_size.max(1)) {
            for object in chunk {
                if self.vector.has_vector(&definition.name, object.id()).await? {
                    continue;
                }
                let outcomes = self.on_object_upserted(object, None).await?;
                if outcomes
                    .iter()
                    .any(|o| matches!(o, EmbeddingOutcome::Embedded { definition: d } if d == &definition.name))
                {
                    embedded += 1;
                }
            }
        }
        Ok(embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryVector;
    use crate::embedding::embedder::HashEmbedder;
    use crate::types::{EmbeddingDefinition, ObjectTypeDefinition, PropertyDataType, PropertyDefinition};
    use std::collections::HashMap as Map;

    fn setup() -> (Arc<Registry>, EmbeddingCoordinator) {
        let registry = Arc::new(Registry::new());
        registry
            .create_object_type(ObjectTypeDefinition::new(
                "Paper",
                vec![
                    PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                    PropertyDefinition::new("title", PropertyDataType::Text).nullable(true),
                ],
            ))
            .unwrap();
        registry
            .create_embedding_definition(EmbeddingDefinition::new(
                "paper_title_embed",
                "Paper",
                "title",
                "reference-hash-embedder",
            ))
            .unwrap();
        let vector = Arc::new(InMemoryVector::new());
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(8));
        let coordinator = EmbeddingCoordinator::new(registry.clone(), vector, vec![embedder], 256);
        (registry, coordinator)
    }

    #[tokio::test]
    async fn embeds_on_first_upsert_and_skips_when_unchanged() {
        let (_registry, coordinator) = setup();
        let mut props = Map::new();
        props.insert("title".to_string(), PropertyValue::Text("Graph Theory".into()));
        let object = ObjectInstance::new("Paper", props);

        let first = coordinator.on_object_upserted(&object, None).await.unwrap();
        assert_eq!(first, vec![EmbeddingOutcome::Embedded {
            definition: "paper_title_embed".into()
        }]);

        let second = coordinator.on_object_upserted(&object, Some(&object)).await.unwrap();
        assert_eq!(second, vec![EmbeddingOutcome::Skipped {
            definition: "paper_title_embed".into()
        }]);
    }

    #[tokio::test]
    async fn stores_source_text_preview_alongside_vector() {
        let registry = Arc::new(Registry::new());
        registry
            .create_object_type(ObjectTypeDefinition::new(
                "Paper",
                vec![
                    PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                    PropertyDefinition::new("title", PropertyDataType::Text).nullable(true),
                ],
            ))
            .unwrap();
        registry
            .create_embedding_definition(EmbeddingDefinition::new(
                "paper_title_embed",
                "Paper",
                "title",
                "reference-hash-embedder",
            ))
            .unwrap();
        let vector = Arc::new(InMemoryVector::new());
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(8));
        // A 10-byte budget forces truncation of longer titles.
        let coordinator = EmbeddingCoordinator::new(registry, vector.clone(), vec![embedder], 10);

        let mut props = Map::new();
        props.insert("title".to_string(), PropertyValue::Text("Graph Theory Fundamentals".into()));
        let object = ObjectInstance::new("Paper", props);
        coordinator.on_object_upserted(&object, None).await.unwrap();

        let preview = vector
            .get_preview("paper_title_embed", object.id())
            .await
            .unwrap()
            .unwrap();
        assert!(preview.starts_with("Graph Theo"));
        assert!(preview.ends_with('…'));
    }

    #[tokio::test]
    async fn clears_vector_when_source_property_goes_null() {
        let (_registry, coordinator) = setup();
        let mut props = Map::new();
        props.insert("title".to_string(), PropertyValue::Text("Graph Theory".into()));
        let object = ObjectInstance::new("Paper", props);
        coordinator.on_object_upserted(&object, None).await.unwrap();

        let mut cleared_props = Map::new();
        cleared_props.insert("title".to_string(), PropertyValue::Null);
        let mut cleared = object.clone();
        cleared.properties = cleared_props;
        let outcomes = coordinator.on_object_upserted(&cleared, Some(&object)).await.unwrap();
        assert_eq!(outcomes, vec![EmbeddingOutcome::Cleared {
            definition: "paper_title_embed".into()
        }]);
    }
}
