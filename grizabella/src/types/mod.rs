//! The typed data model: property values, schema definitions, and the
//! instances (objects, relations, embeddings) that carry them.

mod instance;
mod schema;
mod value;

pub use instance::{
    EmbeddingInstance, MemoryInstance, ObjectInstance, RelationInstance, DEFAULT_WEIGHT, MAX_WEIGHT,
    MIN_WEIGHT,
};
pub use schema::{
    EmbeddingDefinition, ObjectTypeDefinition, PropertyDefinition, RelationTypeDefinition,
};
pub use value::{PropertyDataType, PropertyValue};
