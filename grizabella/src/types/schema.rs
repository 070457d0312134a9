//! Schema definitions: the shapes the Schema Registry catalogs.

use super::value::PropertyDataType;
use serde::{Deserialize, Serialize};

/// A single property slot on an object or relation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub data_type: PropertyDataType,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_indexed: bool,
    #[serde(default)]
    pub is_unique: bool,
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, data_type: PropertyDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_primary_key: false,
            is_nullable: true,
            is_indexed: false,
            is_unique: false,
            description: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self.is_nullable = false;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.is_nullable = nullable;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An object type: the relational/graph/vector-spanning record shape that
/// object instances are validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub properties: Vec<PropertyDefinition>,
}

impl ObjectTypeDefinition {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDefinition>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn primary_key(&self) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.is_primary_key)
    }

    /// Validate the structural invariants: at least one property,
    /// unique names within the type, at most one primary key, and
    /// primary-key/unique properties are non-nullable.
    pub fn validate_shape(&self) -> Result<(), String> {
        if self.properties.is_empty() {
            return Err(format!(
                "object type '{}' must declare at least one property",
                self.name
            ));
        }

        let mut seen = std::collections::HashSet::new();
        let mut primary_keys = 0;
        for prop in &self.properties {
            if !seen.insert(prop.name.as_str()) {
                return Err(format!(
                    "object type '{}' declares duplicate property '{}'",
                    self.name, prop.name
                ));
            }
            if prop.is_primary_key {
                primary_keys += 1;
                if prop.is_nullable {
                    return Err(format!(
                        "primary key property '{}' on '{}' must be non-nullable",
                        prop.name, self.name
                    ));
                }
            }
            if prop.is_unique && prop.is_nullable {
                return Err(format!(
                    "unique property '{}' on '{}' must be non-nullable",
                    prop.name, self.name
                ));
            }
        }
        if primary_keys > 1 {
            return Err(format!(
                "object type '{}' declares {} primary key properties, at most one is allowed",
                self.name, primary_keys
            ));
        }
        Ok(())
    }
}

/// A relation type: the typed, directed edge shape relation instances are
/// validated against. `source_types`/`target_types` enumerate the
/// object-type names allowed at each endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub source_types: Vec<String>,
    pub target_types: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl RelationTypeDefinition {
    pub fn new(
        name: impl Into<String>,
        source_types: Vec<String>,
        target_types: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_types,
            target_types,
            properties: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<PropertyDefinition>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn validate_shape(&self) -> Result<(), String> {
        if self.source_types.is_empty() {
            return Err(format!(
                "relation type '{}' must declare at least one source type",
                self.name
            ));
        }
        if self.target_types.is_empty() {
            return Err(format!(
                "relation type '{}' must declare at least one target type",
                self.name
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for prop in &self.properties {
            if !seen.insert(prop.name.as_str()) {
                return Err(format!(
                    "relation type '{}' declares duplicate property '{}'",
                    self.name, prop.name
                ));
            }
        }
        Ok(())
    }
}

/// An embedding definition: which TEXT property of which object type gets
/// (re)computed into a vector by which model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingDefinition {
    pub name: String,
    pub object_type_name: String,
    pub source_property_name: String,
    pub embedding_model_id: String,
    pub dimensions: Option<usize>,
    pub description: Option<String>,
}

impl EmbeddingDefinition {
    pub fn new(
        name: impl Into<String>,
        object_type_name: impl Into<String>,
        source_property_name: impl Into<String>,
        embedding_model_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            object_type_name: object_type_name.into(),
            source_property_name: source_property_name.into(),
            embedding_model_id: embedding_model_id.into(),
            dimensions: None,
            description: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_two_primary_keys() {
        let def = ObjectTypeDefinition::new(
            "Paper",
            vec![
                PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                PropertyDefinition::new("doi", PropertyDataType::Text).primary_key(),
            ],
        );
        assert!(def.validate_shape().is_err());
    }

    #[test]
    fn rejects_nullable_primary_key() {
        let mut pk = PropertyDefinition::new("id", PropertyDataType::Uuid);
        pk.is_primary_key = true; // nullable left at default true
        let def = ObjectTypeDefinition::new("Paper", vec![pk]);
        assert!(def.validate_shape().is_err());
    }

    #[test]
    fn accepts_well_formed_type() {
        let def = ObjectTypeDefinition::new(
            "Paper",
            vec![
                PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                PropertyDefinition::new("title", PropertyDataType::Text),
            ],
        );
        assert!(def.validate_shape().is_ok());
    }
}
