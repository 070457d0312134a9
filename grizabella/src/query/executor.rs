//! The query executor: evaluates a `PlannedQuery` bottom-up against
//! live store adapters, producing a hydrated, possibly partial, result.

use super::planner::{PlannedClause, PlannedComponent, PlannedQuery, Step};
use crate::adapters::{GraphAdapter, RelationalAdapter, VectorAdapter};
use crate::error::Result;
use crate::types::ObjectInstance;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// The outcome of running a `ComplexQuery`: hydrated instances plus any
/// non-fatal errors encountered along the way.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct QueryResult {
    pub instances: Vec<ObjectInstance>,
    pub errors: Vec<String>,
    pub cancelled: bool,
}

/// The evaluated candidate set for one clause: the object type it ranges
/// over, the matching ids, and — only meaningful at the driving component —
/// a similarity ordering imposed by an embedding search.
struct Evaluated {
    object_type: String,
    ids: HashSet<Uuid>,
    ordering: Option<Vec<Uuid>>,
}

pub struct Executor {
    relational: Arc<dyn RelationalAdapter>,
    vector: Arc<dyn VectorAdapter>,
    graph: Arc<dyn GraphAdapter>,
    deadline: Option<Instant>,
}

impl Executor {
    pub fn new(
        relational: Arc<dyn RelationalAdapter>,
        vector: Arc<dyn VectorAdapter>,
        graph: Arc<dyn GraphAdapter>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            relational,
            vector,
            graph,
            deadline,
        }
    }

    fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub async fn execute(&self, plan: &PlannedQuery) -> Result<QueryResult> {
        let mut errors = Vec::new();
        if self.deadline_exceeded() {
            return Ok(QueryResult {
                instances: Vec::new(),
                errors: vec!["cancelled: deadline exceeded before execution started".into()],
                cancelled: true,
            });
        }

        let evaluated = self.eval_clause(&plan.root, &mut errors).await;
        let Some(evaluated) = evaluated else {
            return Ok(QueryResult {
                instances: Vec::new(),
                errors,
                cancelled: self.deadline_exceeded(),
            });
        };

        let ordered_ids = match evaluated.ordering {
            Some(order) => order,
            None => {
                let mut ids: Vec<Uuid> = evaluated.ids.into_iter().collect();
                ids.sort();
                ids
            }
        };

        let mut instances = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if self.deadline_exceeded() {
                errors.push("cancelled: deadline exceeded during hydration".into());
                return Ok(QueryResult {
                    instances,
                    errors,
                    cancelled: true,
                });
            }
            match self.relational.get_object(&evaluated.object_type, id).await {
                Ok(Some(object)) => instances.push(object),
                Ok(None) => {}
                Err(err) => errors.push(err.to_string()),
            }
        }

        Ok(QueryResult {
            instances,
            errors,
            cancelled: false,
        })
    }

    /// Evaluates a clause, returning `None` only when the clause produced
    /// no usable result at all (its errors are pushed to `errors`).
    fn eval_clause<'a>(
        &'a self,
        clause: &'a PlannedClause,
        errors: &'a mut Vec<String>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Option<Evaluated>> + Send + 'a>> {
        Box::pin(async move {
        if self.deadline_exceeded() {
            errors.push("cancelled: deadline exceeded between clauses".into());
            return None;
        }
        match clause {
            PlannedClause::Component(component) => self.eval_component(component, errors).await,
            PlannedClause::And(children) => {
                let mut result: Option<Evaluated> = None;
                for child in children {
                    match self.eval_clause(child, errors).await {
                        Some(evaluated) => {
                            result = Some(match result {
                                None => evaluated,
                                Some(acc) => intersect(acc, evaluated),
                            });
                        }
                        // A failed child inside And makes the whole And empty.
                        None => {
                            return result.map(|acc| Evaluated {
                                ids: HashSet::new(),
                                ordering: None,
                                ..acc
                            });
                        }
                    }
                }
                result
            }
            PlannedClause::Or(children) => {
                let mut result: Option<Evaluated> = None;
                for child in children {
                    if let Some(evaluated) = self.eval_clause(child, errors).await {
                        result = Some(match result {
                            None => evaluated,
                            Some(acc) => union(acc, evaluated),
                        });
                    }
                    // A failed child inside Or is simply skipped; survivors continue.
                }
                result
            }
            PlannedClause::Not(inner) => {
                let inner_evaluated = self.eval_clause(inner, errors).await?;
                let object_type = inner_evaluated.object_type.clone();
                match self.relational.find_objects(&object_type, &[], None).await {
                    Ok(all) => {
                        let all_ids: HashSet<Uuid> = all.iter().map(|o| o.id()).collect();
                        Some(Evaluated {
                            ids: all_ids.difference(&inner_evaluated.ids).copied().collect(),
                            object_type,
                            ordering: None,
                        })
                    }
                    Err(err) => {
                        errors.push(err.to_string());
                        None
                    }
                }
            }
        }
        })
    }

    async fn eval_component(&self, component: &PlannedComponent, errors: &mut Vec<String>) -> Option<Evaluated> {
        let mut candidate: Option<HashSet<Uuid>> = None;
        let mut ordering: Option<Vec<Uuid>> = None;

        for step in &component.steps {
            if self.deadline_exceeded() {
                errors.push("cancelled: deadline exceeded between steps".into());
                return None;
            }
            match step {
                Step::Rel(filters) => {
                    match self.relational.find_objects(&component.object_type, filters, None).await {
                        Ok(found) => {
                            let ids: HashSet<Uuid> = found.iter().map(|o| o.id()).collect();
                            candidate = Some(intersect_or_seed(candidate, ids));
                        }
                        Err(err) => {
                            errors.push(err.to_string());
                            return None;
                        }
                    }
                }
                Step::Vec(search) => {
                    match self
                        .vector
                        .search(
                            &search.embedding_def_name,
                            &search.query_vector,
                            search.limit.unwrap_or(usize::MAX),
                            search.threshold,
                            search.is_l2,
                        )
                        .await
                    {
                        Ok(scored) => {
                            let ordered_ids: Vec<Uuid> = scored.iter().map(|(id, _)| *id).collect();
                            let ids: HashSet<Uuid> = ordered_ids.iter().copied().collect();
                            candidate = Some(intersect_or_seed(candidate, ids));
                            if ordering.is_none() {
                                ordering = Some(ordered_ids);
                            }
                        }
                        Err(err) => {
                            errors.push(err.to_string());
                            return None;
                        }
                    }
                }
                Step::Graph(hop) => {
                    let anchors: Vec<Uuid> = match &candidate {
                        Some(ids) => ids.iter().copied().collect(),
                        None => match self.relational.find_objects(&component.object_type, &[], None).await {
                            Ok(found) => found.iter().map(|o| o.id()).collect(),
                            Err(err) => {
                                errors.push(err.to_string());
                                return None;
                            }
                        },
                    };

                    let neighbors = match self
                        .graph
                        .neighbors(&anchors, &hop.relation_type, hop.direction, &hop.target_type, hop.target_id, None)
                        .await
                    {
                        Ok(map) => map,
                        Err(err) => {
                            errors.push(err.to_string());
                            return None;
                        }
                    };

                    let target_filter_ids: Option<HashSet<Uuid>> = if hop.target_property_filters.is_empty() {
                        None
                    } else {
                        match self
                            .relational
                            .find_objects(&hop.target_type, &hop.target_property_filters, None)
                            .await
                        {
                            Ok(found) => Some(found.iter().map(|o| o.id()).collect()),
                            Err(err) => {
                                errors.push(err.to_string());
                                return None;
                            }
                        }
                    };

                    // An unpinned same-type hop projects the candidate set onto
                    // the reached targets ("papers cited by my candidates"). A
                    // pinned hop always filters the anchors instead: "papers
                    // that cite paper_4" keeps the citing papers, not paper_4.
                    if hop.target_type == component.object_type && hop.target_id.is_none() {
                        let mut targets: HashSet<Uuid> = neighbors.values().flatten().copied().collect();
                        if let Some(filter_ids) = &target_filter_ids {
                            targets = targets.intersection(filter_ids).copied().collect();
                        }
                        candidate = Some(intersect_or_seed(candidate, targets));
                    } else {
                        let mut qualifying = HashSet::new();
                        for (anchor, targets) in &neighbors {
                            let qualifies = match &target_filter_ids {
                                Some(filter_ids) => targets.iter().any(|t| filter_ids.contains(t)),
                                None => !targets.is_empty(),
                            };
                            if qualifies {
                                qualifying.insert(*anchor);
                            }
                        }
                        candidate = Some(intersect_or_seed(candidate, qualifying));
                    }
                }
            }
        }

        let ids = match candidate {
            Some(ids) => ids,
            None => match self.relational.find_objects(&component.object_type, &[], None).await {
                Ok(found) => found.iter().map(|o| o.id()).collect(),
                Err(err) => {
                    errors.push(err.to_string());
                    return None;
                }
            },
        };

        Some(Evaluated {
            object_type: component.object_type.clone(),
            ids,
            ordering,
        })
    }
}

fn intersect_or_seed(candidate: Option<HashSet<Uuid>>, incoming: HashSet<Uuid>) -> HashSet<Uuid> {
    match candidate {
        None => incoming,
        Some(existing) => existing.intersection(&incoming).copied().collect(),
    }
}

fn intersect(a: Evaluated, b: Evaluated) -> Evaluated {
    Evaluated {
        object_type: a.object_type,
        ids: a.ids.intersection(&b.ids).copied().collect(),
        ordering: None,
    }
}

fn union(a: Evaluated, b: Evaluated) -> Evaluated {
    Evaluated {
        object_type: a.object_type,
        ids: a.ids.union(&b.ids).copied().collect(),
        ordering: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryGraph, InMemoryRelational, InMemoryVector, RelFilter};
    use crate::query::ir::{Component, Query};
    use crate::query::planner::Planner;
    use crate::schema::Registry;
    use crate::types::{ObjectInstance, ObjectTypeDefinition, PropertyDataType, PropertyDefinition, PropertyValue};
    use std::collections::HashMap;

    async fn seeded() -> (Registry, Arc<dyn RelationalAdapter>, Arc<dyn VectorAdapter>, Arc<dyn GraphAdapter>, Uuid, Uuid) {
        let registry = Registry::new();
        registry
            .create_object_type(ObjectTypeDefinition::new(
                "Paper",
                vec![
                    PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
                    PropertyDefinition::new("year", PropertyDataType::Integer),
                ],
            ))
            .unwrap();
        let relational: Arc<dyn RelationalAdapter> = Arc::new(InMemoryRelational::new());
        let vector: Arc<dyn VectorAdapter> = Arc::new(InMemoryVector::new());
        let graph: Arc<dyn GraphAdapter> = Arc::new(InMemoryGraph::new());

        let mut old_props = HashMap::new();
        old_props.insert("year".to_string(), PropertyValue::Integer(2010));
        let old = ObjectInstance::new("Paper", old_props);
        let old_id = old.id();
        relational.upsert_object("Paper", old).await.unwrap();

        let mut new_props = HashMap::new();
        new_props.insert("year".to_string(), PropertyValue::Integer(2023));
        let recent = ObjectInstance::new("Paper", new_props);
        let recent_id = recent.id();
        relational.upsert_object("Paper", recent).await.unwrap();

        (registry, relational, vector, graph, old_id, recent_id)
    }

    #[tokio::test]
    async fn filters_by_relational_property() {
        let (registry, relational, vector, graph, _old_id, recent_id) = seeded().await;
        let planner = Planner::new(&registry);
        let query = Query::from_components(vec![Component::new("Paper")
            .with_filter(RelFilter::new("year", crate::adapters::Operator::Gt, PropertyValue::Integer(2020)))]);
        let plan = planner.plan(&query).unwrap();
        let executor = Executor::new(relational, vector, graph, None);
        let result = executor.execute(&plan).await.unwrap();
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].id(), recent_id);
    }

    // A same-type hop pinned to a target id keeps the anchors that reach
    // that target, not the target itself.
    #[tokio::test]
    async fn pinned_same_type_hop_filters_anchors() {
        let (registry, relational, vector, graph, old_id, recent_id) = seeded().await;
        registry
            .create_relation_type(crate::types::RelationTypeDefinition::new(
                "cites",
                vec!["Paper".into()],
                vec!["Paper".into()],
            ))
            .unwrap();
        graph
            .upsert_edge("cites", Uuid::new_v4(), ("Paper".into(), recent_id), ("Paper".into(), old_id))
            .await
            .unwrap();

        let planner = Planner::new(&registry);
        let query = Query::from_components(vec![Component::new("Paper").with_graph_hop(
            crate::query::ir::GraphHop::new("cites", crate::adapters::Direction::Outgoing, "Paper")
                .with_target_id(old_id),
        )]);
        let plan = planner.plan(&query).unwrap();
        let executor = Executor::new(relational, vector, graph, None);
        let result = executor.execute(&plan).await.unwrap();
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].id(), recent_id);
    }

    // An unpinned same-type hop projects the candidate set onto the
    // reached targets.
    #[tokio::test]
    async fn unpinned_same_type_hop_projects_onto_targets() {
        let (registry, relational, vector, graph, old_id, recent_id) = seeded().await;
        registry
            .create_relation_type(crate::types::RelationTypeDefinition::new(
                "cites",
                vec!["Paper".into()],
                vec!["Paper".into()],
            ))
            .unwrap();
        graph
            .upsert_edge("cites", Uuid::new_v4(), ("Paper".into(), recent_id), ("Paper".into(), old_id))
            .await
            .unwrap();

        let planner = Planner::new(&registry);
        let query = Query::from_components(vec![Component::new("Paper").with_graph_hop(
            crate::query::ir::GraphHop::new("cites", crate::adapters::Direction::Outgoing, "Paper"),
        )]);
        let plan = planner.plan(&query).unwrap();
        let executor = Executor::new(relational, vector, graph, None);
        let result = executor.execute(&plan).await.unwrap();
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].id(), old_id);
    }

    #[tokio::test]
    async fn not_under_top_level_and_excludes_matches() {
        let (registry, relational, vector, graph, old_id, _recent_id) = seeded().await;
        let planner = Planner::new(&registry);
        let query = crate::query::ir::Query::new(crate::query::ir::Clause::and(vec![
            Component::new("Paper").into(),
            crate::query::ir::Clause::not(
                Component::new("Paper")
                    .with_filter(RelFilter::new("year", crate::adapters::Operator::Gt, PropertyValue::Integer(2020)))
                    .into(),
            ),
        ]));
        let plan = planner.plan(&query).unwrap();
        let executor = Executor::new(relational, vector, graph, None);
        let result = executor.execute(&plan).await.unwrap();
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].id(), old_id);
    }
}
