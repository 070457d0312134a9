//! In-memory reference implementation of `GraphAdapter`: an adjacency map
//! keyed by `(relation_type, direction)`, mirroring the flat-`HashMap`
//! reference-store style used throughout the other in-memory adapters.

use super::error::{AdapterError, AdapterResult};
use super::traits::{Direction, GraphAdapter};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Edge {
    id: Uuid,
    source: (String, Uuid),
    target: (String, Uuid),
}

#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: RwLock<HashSet<(String, Uuid)>>,
    edges: RwLock<HashMap<String, HashMap<Uuid, Edge>>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphAdapter for InMemoryGraph {
    async fn upsert_node(&self, type_name: &str, id: Uuid) -> AdapterResult<()> {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| AdapterError::Internal("graph node lock poisoned".into()))?;
        nodes.insert((type_name.to_string(), id));
        Ok(())
    }

    async fn delete_node(&self, type_name: &str, id: Uuid) -> AdapterResult<bool> {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| AdapterError::Internal("graph node lock poisoned".into()))?;
        let removed = nodes.remove(&(type_name.to_string(), id));
        let mut edges = self
            .edges
            .write()
            .map_err(|_| AdapterError::Internal("graph edge lock poisoned".into()))?;
        for table in edges.values_mut() {
            table.retain(|_, e| {
                e.source != (type_name.to_string(), id) && e.target != (type_name.to_string(), id)
            });
        }
        Ok(removed)
    }

    async fn node_exists(&self, type_name: &str, id: Uuid) -> AdapterResult<bool> {
        let nodes = self
            .nodes
            .read()
            .map_err(|_| AdapterError::Internal("graph node lock poisoned".into()))?;
        Ok(nodes.contains(&(type_name.to_string(), id)))
    }

    async fn upsert_edge(
        &self,
        relation_type: &str,
        id: Uuid,
        source: (String, Uuid),
        target: (String, Uuid),
    ) -> AdapterResult<()> {
        let mut edges = self
            .edges
            .write()
            .map_err(|_| AdapterError::Internal("graph edge lock poisoned".into()))?;
        edges
            .entry(relation_type.to_string())
            .or_default()
            .insert(id, Edge { id, source, target });
        Ok(())
    }

    async fn delete_edge(&self, relation_type: &str, id: Uuid) -> AdapterResult<bool> {
        let mut edges = self
            .edges
            .write()
            .map_err(|_| AdapterError::Internal("graph edge lock poisoned".into()))?;
        Ok(edges
            .get_mut(relation_type)
            .map(|t| t.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn neighbors(
        &self,
        anchors: &[Uuid],
        relation_type: &str,
        direction: Direction,
        target_type: &str,
        target_id: Option<Uuid>,
        limit: Option<usize>,
    ) -> AdapterResult<HashMap<Uuid, Vec<Uuid>>> {
        let edges = self
            .edges
            .read()
            .map_err(|_| AdapterError::Internal("graph edge lock poisoned".into()))?;
        let anchor_set: HashSet<Uuid> = anchors.iter().copied().collect();
        let mut result: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let Some(table) = edges.get(relation_type) else {
            return Ok(result);
        };
        for edge in table.values() {
            let (anchor_side, other_side) = match direction {
                Direction::Outgoing => (&edge.source, &edge.target),
                Direction::Incoming => (&edge.target, &edge.source),
            };
            if !anchor_set.contains(&anchor_side.1) {
                continue;
            }
            if other_side.0 != target_type {
                continue;
            }
            if let Some(pin) = target_id {
                if other_side.1 != pin {
                    continue;
                }
            }
            let bucket = result.entry(anchor_side.1).or_default();
            if !bucket.contains(&other_side.1) {
                bucket.push(other_side.1);
            }
        }
        if let Some(limit) = limit {
            for bucket in result.values_mut() {
                bucket.truncate(limit);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn neighbors_respects_direction_and_target_type() {
        let graph = InMemoryGraph::new();
        let (paper, author) = (Uuid::new_v4(), Uuid::new_v4());
        graph.upsert_node("Paper", paper).await.unwrap();
        graph.upsert_node("Author", author).await.unwrap();
        graph
            .upsert_edge(
                "authored_by",
                Uuid::new_v4(),
                ("Paper".into(), paper),
                ("Author".into(), author),
            )
            .await
            .unwrap();

        let out = graph
            .neighbors(&[paper], "authored_by", Direction::Outgoing, "Author", None, None)
            .await
            .unwrap();
        assert_eq!(out.get(&paper), Some(&vec![author]));

        let in_dir = graph
            .neighbors(&[author], "authored_by", Direction::Incoming, "Paper", None, None)
            .await
            .unwrap();
        assert_eq!(in_dir.get(&author), Some(&vec![paper]));
    }

    #[tokio::test]
    async fn delete_node_prunes_incident_edges() {
        let graph = InMemoryGraph::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        graph.upsert_node("Paper", a).await.unwrap();
        graph.upsert_node("Author", b).await.unwrap();
        let edge_id = Uuid::new_v4();
        graph
            .upsert_edge("authored_by", edge_id, ("Paper".into(), a), ("Author".into(), b))
            .await
            .unwrap();
        graph.delete_node("Paper", a).await.unwrap();
        let out = graph
            .neighbors(&[a], "authored_by", Direction::Outgoing, "Author", None, None)
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
