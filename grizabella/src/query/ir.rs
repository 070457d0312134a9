//! The query intermediate representation: a boolean tree of
//! `Component`s, each describing one object type's relational filters,
//! embedding searches, and graph hops.

use crate::adapters::{Direction, RelFilter};
use serde::{Deserialize, Serialize};

/// One similarity search against a named embedding collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSearch {
    pub embedding_def_name: String,
    pub query_vector: Vec<f32>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f32>,
    #[serde(default)]
    pub is_l2: bool,
}

impl EmbeddingSearch {
    pub fn new(embedding_def_name: impl Into<String>, query_vector: Vec<f32>) -> Self {
        Self {
            embedding_def_name: embedding_def_name.into(),
            query_vector,
            limit: None,
            threshold: None,
            is_l2: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn l2(mut self) -> Self {
        self.is_l2 = true;
        self
    }
}

/// One hop across typed relations, optionally pinned to a single target id
/// and/or constrained by property filters on the target object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphHop {
    pub relation_type: String,
    pub direction: Direction,
    pub target_type: String,
    #[serde(default)]
    pub target_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub target_property_filters: Vec<RelFilter>,
}

impl GraphHop {
    pub fn new(relation_type: impl Into<String>, direction: Direction, target_type: impl Into<String>) -> Self {
        Self {
            relation_type: relation_type.into(),
            direction,
            target_type: target_type.into(),
            target_id: None,
            target_property_filters: Vec::new(),
        }
    }

    pub fn with_target_id(mut self, id: uuid::Uuid) -> Self {
        self.target_id = Some(id);
        self
    }

    pub fn with_target_filter(mut self, filter: RelFilter) -> Self {
        self.target_property_filters.push(filter);
        self
    }
}

/// A leaf of the query tree: everything needed to produce a candidate set
/// of ids for one object type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub object_type: String,
    #[serde(default)]
    pub relational_filters: Vec<RelFilter>,
    #[serde(default)]
    pub embedding_searches: Vec<EmbeddingSearch>,
    #[serde(default)]
    pub graph_traversals: Vec<GraphHop>,
}

impl Component {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            relational_filters: Vec::new(),
            embedding_searches: Vec::new(),
            graph_traversals: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: RelFilter) -> Self {
        self.relational_filters.push(filter);
        self
    }

    pub fn with_embedding_search(mut self, search: EmbeddingSearch) -> Self {
        self.embedding_searches.push(search);
        self
    }

    pub fn with_graph_hop(mut self, hop: GraphHop) -> Self {
        self.graph_traversals.push(hop);
        self
    }
}

/// The boolean tree over `Component` candidate sets. `Not` is valid
/// only directly beneath an `And` node, wherever that `And` sits in the
/// tree — the planner rejects any other placement.
///
/// Wire form is externally tagged: `{"component": {...}}`, `{"and": [...]}`,
/// `{"or": [...]}`, `{"not": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clause {
    Component(Box<Component>),
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn and(clauses: Vec<Clause>) -> Self {
        Clause::And(clauses)
    }

    pub fn or(clauses: Vec<Clause>) -> Self {
        Clause::Or(clauses)
    }

    pub fn not(clause: Clause) -> Self {
        Clause::Not(Box::new(clause))
    }
}

impl From<Component> for Clause {
    fn from(component: Component) -> Self {
        Clause::Component(Box::new(component))
    }
}

/// A query is just its root clause. The legacy flat `components: [...]`
/// wire form is interpreted as `And(components)` on deserialization;
/// in-process callers reach the same shape via `Query::from_components`.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    pub root: Clause,
}

impl Query {
    pub fn new(root: Clause) -> Self {
        Self { root }
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self {
            root: Clause::And(components.into_iter().map(Clause::from).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            root: Option<Clause>,
            #[serde(default)]
            components: Vec<Component>,
        }

        let wire = Wire::deserialize(deserializer)?;
        match wire.root {
            Some(root) => Ok(Query { root }),
            None if !wire.components.is_empty() => Ok(Query::from_components(wire.components)),
            None => Err(serde::de::Error::custom(
                "query requires either a 'root' clause or a non-empty 'components' list",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Operator;
    use crate::types::PropertyValue;

    #[test]
    fn deserializes_root_clause_form() {
        let raw = serde_json::json!({
            "root": {
                "component": {
                    "object_type": "Paper",
                    "relational_filters": [
                        { "property": "year", "operator": "gt", "value": 2010 }
                    ]
                }
            }
        });
        let query: Query = serde_json::from_value(raw).unwrap();
        let Clause::Component(component) = &query.root else {
            panic!("expected a component root");
        };
        assert_eq!(component.object_type, "Paper");
        assert_eq!(
            component.relational_filters,
            vec![RelFilter::new("year", Operator::Gt, PropertyValue::Integer(2010))]
        );
    }

    #[test]
    fn legacy_components_form_becomes_and() {
        let raw = serde_json::json!({
            "components": [
                { "object_type": "Paper" },
                { "object_type": "Paper" }
            ]
        });
        let query: Query = serde_json::from_value(raw).unwrap();
        let Clause::And(children) = &query.root else {
            panic!("expected an And root");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn rejects_query_with_neither_form() {
        let raw = serde_json::json!({ "components": [] });
        assert!(serde_json::from_value::<Query>(raw).is_err());
    }
}
