//! Stored instances: objects, relations, and internal embeddings, all
//! built on the `MemoryInstance` base fields every stored record carries.

use super::value::PropertyValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Default weight assigned to a newly upserted instance.
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Inclusive lower bound of the `weight` range.
pub const MIN_WEIGHT: f64 = 0.0;
/// Inclusive upper bound of the `weight` range.
pub const MAX_WEIGHT: f64 = 10.0;

/// Fields shared by every stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInstance {
    pub id: Uuid,
    pub weight: f64,
    pub upsert_date: DateTime<Utc>,
}

impl MemoryInstance {
    /// A freshly assigned instance: a new id, default weight, and `now`.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            weight: DEFAULT_WEIGHT,
            upsert_date: Utc::now(),
        }
    }

    pub fn validate_weight(weight: f64) -> Result<(), String> {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(format!(
                "weight {} is outside the allowed range [{}, {}]",
                weight, MIN_WEIGHT, MAX_WEIGHT
            ));
        }
        Ok(())
    }
}

impl Default for MemoryInstance {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored object: a typed property bag identified by `object_type_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInstance {
    #[serde(flatten)]
    pub base: MemoryInstance,
    pub object_type_name: String,
    pub properties: HashMap<String, PropertyValue>,
}

impl ObjectInstance {
    pub fn new(object_type_name: impl Into<String>, properties: HashMap<String, PropertyValue>) -> Self {
        Self {
            base: MemoryInstance::new(),
            object_type_name: object_type_name.into(),
            properties,
        }
    }

    pub fn id(&self) -> Uuid {
        self.base.id
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A stored relation: a typed, directed, property-bearing edge between two
/// object instances, referenced weakly by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationInstance {
    #[serde(flatten)]
    pub base: MemoryInstance,
    pub relation_type_name: String,
    pub source_id: Uuid,
    pub target_id: Uuid,
    pub properties: HashMap<String, PropertyValue>,
}

impl RelationInstance {
    pub fn new(
        relation_type_name: impl Into<String>,
        source_id: Uuid,
        target_id: Uuid,
        properties: HashMap<String, PropertyValue>,
    ) -> Self {
        Self {
            base: MemoryInstance::new(),
            relation_type_name: relation_type_name.into(),
            source_id,
            target_id,
            properties,
        }
    }

    pub fn id(&self) -> Uuid {
        self.base.id
    }
}

/// An internal embedding row: the vector computed from one object's source
/// text by one embedding definition. Owned by the object; never
/// exposed directly through the public API, only via similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingInstance {
    #[serde(flatten)]
    pub base: MemoryInstance,
    pub object_instance_id: Uuid,
    pub embedding_definition_name: String,
    pub vector: Vec<f32>,
    pub source_text_preview: Option<String>,
}

impl EmbeddingInstance {
    pub fn new(
        object_instance_id: Uuid,
        embedding_definition_name: impl Into<String>,
        vector: Vec<f32>,
        source_text_preview: Option<String>,
    ) -> Self {
        Self {
            base: MemoryInstance::new(),
            object_instance_id,
            embedding_definition_name: embedding_definition_name.into(),
            vector,
            source_text_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_validation_rejects_out_of_range() {
        assert!(MemoryInstance::validate_weight(-0.1).is_err());
        assert!(MemoryInstance::validate_weight(10.1).is_err());
        assert!(MemoryInstance::validate_weight(0.0).is_ok());
        assert!(MemoryInstance::validate_weight(10.0).is_ok());
    }

    #[test]
    fn new_object_instance_gets_fresh_id_and_default_weight() {
        let obj = ObjectInstance::new("Paper", HashMap::new());
        assert_eq!(obj.base.weight, DEFAULT_WEIGHT);
        assert_ne!(obj.id(), Uuid::nil());
    }
}
