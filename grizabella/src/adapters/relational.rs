//! In-memory reference implementation of `RelationalAdapter`: plain
//! `HashMap`s guarded by one `RwLock` per table family.

use super::error::{AdapterError, AdapterResult};
use super::filter::RelFilter;
use super::traits::{MetaTable, RelationQuery, RelationalAdapter};
use crate::types::{ObjectInstance, PropertyValue, RelationInstance};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryRelational {
    objects: RwLock<HashMap<String, HashMap<Uuid, ObjectInstance>>>,
    relations: RwLock<HashMap<String, HashMap<Uuid, RelationInstance>>>,
    meta: RwLock<HashMap<&'static str, HashMap<String, serde_json::Value>>>,
}

impl InMemoryRelational {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelationalAdapter for InMemoryRelational {
    async fn upsert_object(&self, type_name: &str, object: ObjectInstance) -> AdapterResult<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        objects
            .entry(type_name.to_string())
            .or_default()
            .insert(object.id(), object);
        Ok(())
    }

    async fn get_object(&self, type_name: &str, id: Uuid) -> AdapterResult<Option<ObjectInstance>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        Ok(objects.get(type_name).and_then(|t| t.get(&id)).cloned())
    }

    async fn delete_object(&self, type_name: &str, id: Uuid) -> AdapterResult<bool> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        Ok(objects
            .get_mut(type_name)
            .map(|t| t.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn find_objects(
        &self,
        type_name: &str,
        filters: &[RelFilter],
        limit: Option<usize>,
    ) -> AdapterResult<Vec<ObjectInstance>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        let mut matched: Vec<ObjectInstance> = objects
            .get(type_name)
            .into_iter()
            .flat_map(|t| t.values())
            .filter(|obj| filters.iter().all(|f| f.matches(obj.property(&f.property))))
            .cloned()
            .collect();
        matched.sort_by_key(|o| o.id());
        if let Some(limit) = limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn count_objects(&self, type_name: &str) -> AdapterResult<usize> {
        let objects = self
            .objects
            .read()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        Ok(objects.get(type_name).map(|t| t.len()).unwrap_or(0))
    }

    async fn object_property_taken(
        &self,
        type_name: &str,
        property: &str,
        value: &PropertyValue,
        excluding_id: Option<Uuid>,
    ) -> AdapterResult<bool> {
        let objects = self
            .objects
            .read()
            .map_err(|_| AdapterError::Internal("object table lock poisoned".into()))?;
        Ok(objects.get(type_name).into_iter().flat_map(|t| t.values()).any(|obj| {
            Some(obj.id()) != excluding_id && obj.property(property) == Some(value)
        }))
    }

    async fn upsert_relation(&self, relation_type: &str, relation: RelationInstance) -> AdapterResult<()> {
        let mut relations = self
            .relations
            .write()
            .map_err(|_| AdapterError::Internal("relation table lock poisoned".into()))?;
        relations
            .entry(relation_type.to_string())
            .or_default()
            .insert(relation.id(), relation);
        Ok(())
    }

    async fn get_relation(&self, relation_type: &str, id: Uuid) -> AdapterResult<Option<RelationInstance>> {
        let relations = self
            .relations
            .read()
            .map_err(|_| AdapterError::Internal("relation table lock poisoned".into()))?;
        Ok(relations.get(relation_type).and_then(|t| t.get(&id)).cloned())
    }

    async fn delete_relation(&self, relation_type: &str, id: Uuid) -> AdapterResult<bool> {
        let mut relations = self
            .relations
            .write()
            .map_err(|_| AdapterError::Internal("relation table lock poisoned".into()))?;
        Ok(relations
            .get_mut(relation_type)
            .map(|t| t.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn find_relations(&self, query: RelationQuery) -> AdapterResult<Vec<RelationInstance>> {
        let relations = self
            .relations
            .read()
            .map_err(|_| AdapterError::Internal("relation table lock poisoned".into()))?;
        let candidates: Box<dyn Iterator<Item = &RelationInstance>> = match &query.relation_type {
            Some(rt) => Box::new(relations.get(rt).into_iter().flat_map(|t| t.values())),
            None => Box::new(relations.values().flat_map(|t| t.values())),
        };
        let mut matched: Vec<RelationInstance> = candidates
            .filter(|rel| query.source_id.is_none_or(|id| rel.source_id == id))
            .filter(|rel| query.target_id.is_none_or(|id| rel.target_id == id))
            .filter(|rel| {
                query
                    .property_filters
                    .iter()
                    .all(|f| f.matches(rel.properties.get(&f.property)))
            })
            .cloned()
            .collect();
        matched.sort_by_key(|r| r.id());
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn put_meta(&self, table: MetaTable, key: &str, value: serde_json::Value) -> AdapterResult<()> {
        let mut meta = self
            .meta
            .write()
            .map_err(|_| AdapterError::Internal("meta table lock poisoned".into()))?;
        meta.entry(table.table_name())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn get_meta(&self, table: MetaTable, key: &str) -> AdapterResult<Option<serde_json::Value>> {
        let meta = self
            .meta
            .read()
            .map_err(|_| AdapterError::Internal("meta table lock poisoned".into()))?;
        Ok(meta.get(table.table_name()).and_then(|t| t.get(key)).cloned())
    }

    async fn list_meta(&self, table: MetaTable) -> AdapterResult<Vec<(String, serde_json::Value)>> {
        let meta = self
            .meta
            .read()
            .map_err(|_| AdapterError::Internal("meta table lock poisoned".into()))?;
        let mut items: Vec<(String, serde_json::Value)> = meta
            .get(table.table_name())
            .into_iter()
            .flat_map(|t| t.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(items)
    }

    async fn delete_meta(&self, table: MetaTable, key: &str) -> AdapterResult<bool> {
        let mut meta = self
            .meta
            .write()
            .map_err(|_| AdapterError::Internal("meta table lock poisoned".into()))?;
        Ok(meta
            .get_mut(table.table_name())
            .map(|t| t.remove(key).is_some())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let store = InMemoryRelational::new();
        let obj = ObjectInstance::new("Paper", Map::new());
        let id = obj.id();
        store.upsert_object("Paper", obj).await.unwrap();
        let fetched = store.get_object("Paper", id).await.unwrap();
        assert_eq!(fetched.unwrap().id(), id);
    }

    #[tokio::test]
    async fn object_property_taken_ignores_excluded_id() {
        let store = InMemoryRelational::new();
        let mut props = Map::new();
        props.insert("slug".to_string(), PropertyValue::Text("a".into()));
        let obj = ObjectInstance::new("Paper", props.clone());
        let id = obj.id();
        store.upsert_object("Paper", obj).await.unwrap();
        assert!(!store
            .object_property_taken("Paper", "slug", &PropertyValue::Text("a".into()), Some(id))
            .await
            .unwrap());
        assert!(store
            .object_property_taken("Paper", "slug", &PropertyValue::Text("a".into()), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn find_relations_filters_by_endpoint() {
        let store = InMemoryRelational::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store
            .upsert_relation("cites", RelationInstance::new("cites", a, b, Map::new()))
            .await
            .unwrap();
        store
            .upsert_relation("cites", RelationInstance::new("cites", a, c, Map::new()))
            .await
            .unwrap();
        let found = store
            .find_relations(RelationQuery {
                relation_type: Some("cites".into()),
                source_id: Some(a),
                target_id: Some(b),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target_id, b);
    }
}
