//! The Schema Registry: the single authority for type definitions
//! and instance validation. Guards its maps behind `RwLock`, matching the
//! adapters' lock-per-table-family style rather than introducing a second
//! concurrency primitive into the crate.

use crate::error::{GrizabellaError, Result};
use crate::types::{
    EmbeddingDefinition, ObjectInstance, ObjectTypeDefinition, PropertyValue, RelationInstance,
    RelationTypeDefinition,
};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct Registry {
    object_types: RwLock<HashMap<String, ObjectTypeDefinition>>,
    relation_types: RwLock<HashMap<String, RelationTypeDefinition>>,
    embedding_defs: RwLock<HashMap<String, EmbeddingDefinition>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_type(&self, def: ObjectTypeDefinition) -> Result<()> {
        def.validate_shape().map_err(GrizabellaError::Validation)?;
        let mut types = self.object_types.write().expect("object type registry lock poisoned");
        if types.contains_key(&def.name) {
            return Err(GrizabellaError::SchemaConflict(format!(
                "object type '{}' already exists",
                def.name
            )));
        }
        types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get_object_type(&self, name: &str) -> Option<ObjectTypeDefinition> {
        self.object_types
            .read()
            .expect("object type registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn list_object_types(&self) -> Vec<ObjectTypeDefinition> {
        let mut types: Vec<_> = self
            .object_types
            .read()
            .expect("object type registry lock poisoned")
            .values()
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Deletes the type if nothing references it: no live instances (the
    /// engine checks via the relational adapter before calling this), and
    /// no relation type or embedding definition still names it.
    pub fn delete_object_type(&self, name: &str) -> Result<()> {
        let relation_types = self
            .relation_types
            .read()
            .expect("relation type registry lock poisoned");
        if let Some(dependent) = relation_types
            .values()
            .find(|rt| rt.source_types.iter().any(|t| t == name) || rt.target_types.iter().any(|t| t == name))
        {
            return Err(GrizabellaError::SchemaConflict(format!(
                "object type '{}' is referenced by relation type '{}'",
                name, dependent.name
            )));
        }
        drop(relation_types);

        let embedding_defs = self
            .embedding_defs
            .read()
            .expect("embedding definition registry lock poisoned");
        if let Some(dependent) = embedding_defs.values().find(|ed| ed.object_type_name == name) {
            return Err(GrizabellaError::SchemaConflict(format!(
                "object type '{}' is referenced by embedding definition '{}'",
                name, dependent.name
            )));
        }
        drop(embedding_defs);

        let mut types = self.object_types.write().expect("object type registry lock poisoned");
        if types.remove(name).is_none() {
            return Err(GrizabellaError::NotFound(format!(
                "object type '{}' does not exist",
                name
            )));
        }
        Ok(())
    }

    pub fn create_relation_type(&self, def: RelationTypeDefinition) -> Result<()> {
        def.validate_shape().map_err(GrizabellaError::Validation)?;
        let object_types = self.object_types.read().expect("object type registry lock poisoned");
        for type_name in def.source_types.iter().chain(def.target_types.iter()) {
            if !object_types.contains_key(type_name) {
                return Err(GrizabellaError::Validation(format!(
                    "relation type '{}' references unknown object type '{}'",
                    def.name, type_name
                )));
            }
        }
        drop(object_types);

        let mut types = self
            .relation_types
            .write()
            .expect("relation type registry lock poisoned");
        if types.contains_key(&def.name) {
            return Err(GrizabellaError::SchemaConflict(format!(
                "relation type '{}' already exists",
                def.name
            )));
        }
        types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get_relation_type(&self, name: &str) -> Option<RelationTypeDefinition> {
        self.relation_types
            .read()
            .expect("relation type registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn list_relation_types(&self) -> Vec<RelationTypeDefinition> {
        let mut types: Vec<_> = self
            .relation_types
            .read()
            .expect("relation type registry lock poisoned")
            .values()
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    pub fn delete_relation_type(&self, name: &str) -> Result<()> {
        let mut types = self
            .relation_types
            .write()
            .expect("relation type registry lock poisoned");
        if types.remove(name).is_none() {
            return Err(GrizabellaError::NotFound(format!(
                "relation type '{}' does not exist",
                name
            )));
        }
        Ok(())
    }

    pub fn create_embedding_definition(&self, def: EmbeddingDefinition) -> Result<()> {
        let object_types = self.object_types.read().expect("object type registry lock poisoned");
        let object_type = object_types.get(&def.object_type_name).ok_or_else(|| {
            GrizabellaError::Validation(format!(
                "embedding definition '{}' references unknown object type '{}'",
                def.name, def.object_type_name
            ))
        })?;
        let source_prop = object_type.property(&def.source_property_name).ok_or_else(|| {
            GrizabellaError::Validation(format!(
                "embedding definition '{}' references unknown property '{}' on '{}'",
                def.name, def.source_property_name, def.object_type_name
            ))
        })?;
        if source_prop.data_type != crate::types::PropertyDataType::Text {
            return Err(GrizabellaError::Validation(format!(
                "embedding definition '{}' source property '{}' must be TEXT",
                def.name, def.source_property_name
            )));
        }
        drop(object_types);

        let mut defs = self
            .embedding_defs
            .write()
            .expect("embedding definition registry lock poisoned");
        if defs.contains_key(&def.name) {
            return Err(GrizabellaError::SchemaConflict(format!(
                "embedding definition '{}' already exists",
                def.name
            )));
        }
        defs.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get_embedding_definition(&self, name: &str) -> Option<EmbeddingDefinition> {
        self.embedding_defs
            .read()
            .expect("embedding definition registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn list_embedding_definitions(&self) -> Vec<EmbeddingDefinition> {
        let mut defs: Vec<_> = self
            .embedding_defs
            .read()
            .expect("embedding definition registry lock poisoned")
            .values()
            .cloned()
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn list_embedding_definitions_for_type(&self, object_type_name: &str) -> Vec<EmbeddingDefinition> {
        self.list_embedding_definitions()
            .into_iter()
            .filter(|ed| ed.object_type_name == object_type_name)
            .collect()
    }

    pub fn delete_embedding_definition(&self, name: &str) -> Result<()> {
        let mut defs = self
            .embedding_defs
            .write()
            .expect("embedding definition registry lock poisoned");
        if defs.remove(name).is_none() {
            return Err(GrizabellaError::NotFound(format!(
                "embedding definition '{}' does not exist",
                name
            )));
        }
        Ok(())
    }

    /// Validate an object instance against its declared type: every
    /// non-nullable property present and correctly typed, no undeclared
    /// properties.
    pub fn validate_object_instance(&self, object: &ObjectInstance) -> Result<()> {
        let object_type = self.get_object_type(&object.object_type_name).ok_or_else(|| {
            GrizabellaError::Validation(format!("unknown object type '{}'", object.object_type_name))
        })?;
        validate_properties(&object_type.name, &object_type.properties, &object.properties)
    }

    /// Validate a relation instance against its declared type: the type
    /// exists, properties type-check, and the endpoints' object types are
    /// in the declared `source_types`/`target_types`.
    pub fn validate_relation_instance(
        &self,
        relation: &RelationInstance,
        source_type_name: &str,
        target_type_name: &str,
    ) -> Result<()> {
        let relation_type = self.get_relation_type(&relation.relation_type_name).ok_or_else(|| {
            GrizabellaError::Validation(format!(
                "unknown relation type '{}'",
                relation.relation_type_name
            ))
        })?;
        if !relation_type.source_types.iter().any(|t| t == source_type_name) {
            return Err(GrizabellaError::Validation(format!(
                "relation type '{}' does not allow source type '{}'",
                relation_type.name, source_type_name
            )));
        }
        if !relation_type.target_types.iter().any(|t| t == target_type_name) {
            return Err(GrizabellaError::Validation(format!(
                "relation type '{}' does not allow target type '{}'",
                relation_type.name, target_type_name
            )));
        }
        validate_properties(&relation_type.name, &relation_type.properties, &relation.properties)
    }
}

fn validate_properties(
    type_name: &str,
    declared: &[crate::types::PropertyDefinition],
    actual: &HashMap<String, PropertyValue>,
) -> Result<()> {
    for prop in declared {
        match actual.get(&prop.name) {
            Some(value) => {
                if !value.matches_type(prop.data_type) {
                    return Err(GrizabellaError::Validation(format!(
                        "property '{}' on '{}' must be {}",
                        prop.name, type_name, prop.data_type
                    )));
                }
                if value.is_null() && !prop.is_nullable {
                    return Err(GrizabellaError::Validation(format!(
                        "property '{}' on '{}' is required",
                        prop.name, type_name
                    )));
                }
            }
            None if !prop.is_nullable => {
                return Err(GrizabellaError::Validation(format!(
                    "property '{}' on '{}' is required",
                    prop.name, type_name
                )));
            }
            None => {}
        }
    }
    for key in actual.keys() {
        if !declared.iter().any(|p| &p.name == key) {
            return Err(GrizabellaError::Validation(format!(
                "'{}' declares no property named '{}'",
                type_name, key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyDataType, PropertyDefinition};

    fn paper_type() -> ObjectTypeDefinition {
        ObjectTypeDefinition::new(
            "Paper",
            vec![
                PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                PropertyDefinition::new("title", PropertyDataType::Text),
                PropertyDefinition::new("abstract", PropertyDataType::Text).nullable(true),
            ],
        )
    }

    #[test]
    fn rejects_duplicate_object_type() {
        let registry = Registry::new();
        registry.create_object_type(paper_type()).unwrap();
        let err = registry.create_object_type(paper_type()).unwrap_err();
        assert!(matches!(err, GrizabellaError::SchemaConflict(_)));
    }

    #[test]
    fn embedding_definition_requires_text_source_property() {
        let registry = Registry::new();
        registry.create_object_type(paper_type()).unwrap();
        let bad = EmbeddingDefinition::new("paper_id_embed", "Paper", "id", "m1");
        assert!(registry.create_embedding_definition(bad).is_err());
        let good = EmbeddingDefinition::new("paper_title_embed", "Paper", "title", "m1");
        assert!(registry.create_embedding_definition(good).is_ok());
    }

    #[test]
    fn delete_object_type_blocked_by_dependent_relation_type() {
        let registry = Registry::new();
        registry.create_object_type(paper_type()).unwrap();
        registry
            .create_object_type(ObjectTypeDefinition::new(
                "Author",
                vec![PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key()],
            ))
            .unwrap();
        registry
            .create_relation_type(RelationTypeDefinition::new(
                "authored_by",
                vec!["Paper".into()],
                vec!["Author".into()],
            ))
            .unwrap();
        let err = registry.delete_object_type("Paper").unwrap_err();
        assert!(matches!(err, GrizabellaError::SchemaConflict(_)));
    }

    #[test]
    fn validate_object_instance_rejects_undeclared_property() {
        let registry = Registry::new();
        registry.create_object_type(paper_type()).unwrap();
        let mut props = HashMap::new();
        props.insert("title".to_string(), PropertyValue::Text("x".into()));
        props.insert("bogus".to_string(), PropertyValue::Text("y".into()));
        let obj = ObjectInstance::new("Paper", props);
        assert!(registry.validate_object_instance(&obj).is_err());
    }
}
