//! In-memory reference implementation of `VectorAdapter`: a flat scan
//! with cosine or L2 scoring, no ANN index.

use super::error::{AdapterError, AdapterResult};
use super::traits::VectorAdapter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredVector {
    vector: Vec<f32>,
    preview: Option<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryVector {
    collections: RwLock<HashMap<String, HashMap<Uuid, StoredVector>>>,
}

impl InMemoryVector {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity in `[-1.0, 1.0]`; `0.0` if either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f32>().sqrt()
}

#[async_trait]
impl VectorAdapter for InMemoryVector {
    async fn ensure_collection(&self, embedding_def: &str, _dimensions: usize) -> AdapterResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        collections.entry(embedding_def.to_string()).or_default();
        Ok(())
    }

    async fn upsert(
        &self,
        embedding_def: &str,
        object_id: Uuid,
        vector: Vec<f32>,
        preview: Option<String>,
    ) -> AdapterResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        collections
            .entry(embedding_def.to_string())
            .or_default()
            .insert(object_id, StoredVector { vector, preview });
        Ok(())
    }

    async fn delete(&self, embedding_def: &str, object_id: Uuid) -> AdapterResult<bool> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        Ok(collections
            .get_mut(embedding_def)
            .map(|c| c.remove(&object_id).is_some())
            .unwrap_or(false))
    }

    async fn get_preview(&self, embedding_def: &str, object_id: Uuid) -> AdapterResult<Option<String>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        Ok(collections
            .get(embedding_def)
            .and_then(|c| c.get(&object_id))
            .and_then(|v| v.preview.clone()))
    }

    async fn has_vector(&self, embedding_def: &str, object_id: Uuid) -> AdapterResult<bool> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        Ok(collections
            .get(embedding_def)
            .map(|c| c.contains_key(&object_id))
            .unwrap_or(false))
    }

    async fn search(
        &self,
        embedding_def: &str,
        query_vector: &[f32],
        limit: usize,
        threshold: Option<f32>,
        is_l2: bool,
    ) -> AdapterResult<Vec<(Uuid, f32)>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AdapterError::Internal("vector collection lock poisoned".into()))?;
        let Some(collection) = collections.get(embedding_def) else {
            return Ok(Vec::new());
        };
        let mut scored: Vec<(Uuid, f32)> = collection
            .iter()
            .map(|(id, stored)| {
                let score = if is_l2 {
                    l2_distance(query_vector, &stored.vector)
                } else {
                    cosine_similarity(query_vector, &stored.vector)
                };
                (*id, score)
            })
            .filter(|(_, score)| match threshold {
                Some(t) if is_l2 => *score <= t,
                Some(t) => *score >= t,
                None => true,
            })
            .collect();
        if is_l2 {
            scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        scored.truncate(limit);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_orders_by_cosine_similarity_descending() {
        let store = InMemoryVector::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.upsert("def", a, vec![1.0, 0.0], None).await.unwrap();
        store.upsert("def", b, vec![0.0, 1.0], None).await.unwrap();
        let results = store.search("def", &[1.0, 0.0], 10, None, false).await.unwrap();
        assert_eq!(results[0].0, a);
    }

    #[tokio::test]
    async fn search_applies_threshold_cutoff() {
        let store = InMemoryVector::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.upsert("def", a, vec![1.0, 0.0], None).await.unwrap();
        store.upsert("def", b, vec![0.0, 1.0], None).await.unwrap();
        let results = store.search("def", &[1.0, 0.0], 10, Some(0.5), false).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, a);
    }
}
