//! The query planner: type-checks a `Query` against the registry and
//! lowers it to a `PlannedQuery` with steps ordered by estimated
//! selectivity.

use super::ir::{Clause, Component, EmbeddingSearch, GraphHop, Query};
use crate::adapters::RelFilter;
use crate::error::{GrizabellaError, Result};
use crate::schema::Registry;
use crate::types::ObjectTypeDefinition;

/// One unit of work against a store, in the order the executor should run
/// it within a component.
#[derive(Debug, Clone)]
pub enum Step {
    Rel(Vec<RelFilter>),
    Vec(EmbeddingSearch),
    Graph(GraphHop),
}

#[derive(Debug, Clone)]
pub struct PlannedComponent {
    pub object_type: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub enum PlannedClause {
    Component(Box<PlannedComponent>),
    And(Vec<PlannedClause>),
    Or(Vec<PlannedClause>),
    Not(Box<PlannedClause>),
}

#[derive(Debug, Clone)]
pub struct PlannedQuery {
    pub root: PlannedClause,
}

pub struct Planner<'a> {
    registry: &'a Registry,
}

impl<'a> Planner<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn plan(&self, query: &Query) -> Result<PlannedQuery> {
        validate_not_placement(&query.root, false)?;
        Ok(PlannedQuery {
            root: self.plan_clause(&query.root)?,
        })
    }

    fn plan_clause(&self, clause: &Clause) -> Result<PlannedClause> {
        match clause {
            Clause::Component(component) => Ok(PlannedClause::Component(Box::new(self.plan_component(component)?))),
            Clause::And(children) => Ok(PlannedClause::And(
                children.iter().map(|c| self.plan_clause(c)).collect::<Result<_>>()?,
            )),
            Clause::Or(children) => Ok(PlannedClause::Or(
                children.iter().map(|c| self.plan_clause(c)).collect::<Result<_>>()?,
            )),
            Clause::Not(inner) => Ok(PlannedClause::Not(Box::new(self.plan_clause(inner)?))),
        }
    }

    fn plan_component(&self, component: &Component) -> Result<PlannedComponent> {
        let object_type = self.registry.get_object_type(&component.object_type).ok_or_else(|| {
            GrizabellaError::Query(format!("unknown object type '{}'", component.object_type))
        })?;

        for filter in &component.relational_filters {
            type_check_filter(&object_type, filter)?;
        }
        for hop in &component.graph_traversals {
            for filter in &hop.target_property_filters {
                let target_type = self.registry.get_object_type(&hop.target_type).ok_or_else(|| {
                    GrizabellaError::Query(format!("unknown object type '{}'", hop.target_type))
                })?;
                type_check_filter(&target_type, filter)?;
            }
        }
        for search in &component.embedding_searches {
            if self.registry.get_embedding_definition(&search.embedding_def_name).is_none() {
                return Err(GrizabellaError::Query(format!(
                    "unknown embedding definition '{}'",
                    search.embedding_def_name
                )));
            }
        }

        Ok(PlannedComponent {
            object_type: component.object_type.clone(),
            steps: order_steps(&object_type, component),
        })
    }
}

fn type_check_filter(object_type: &ObjectTypeDefinition, filter: &RelFilter) -> Result<()> {
    let prop = object_type.property(&filter.property).ok_or_else(|| {
        GrizabellaError::Query(format!(
            "'{}' declares no property named '{}'",
            object_type.name, filter.property
        ))
    })?;
    if !filter.value.is_null() && !filter.value.matches_type(prop.data_type) {
        return Err(GrizabellaError::Query(format!(
            "filter on '{}.{}' expects a {} value",
            object_type.name, filter.property, prop.data_type
        )));
    }
    Ok(())
}

/// Order steps by estimated selectivity: equality on unique/indexed
/// properties and other relational filters collapse into a single
/// `RelStep` (the in-memory adapter evaluates them together in one call),
/// then graph hops pinned to a single target id, then embedding searches,
/// then unbounded graph hops.
fn order_steps(_object_type: &ObjectTypeDefinition, component: &Component) -> Vec<Step> {
    let mut steps = Vec::new();
    if !component.relational_filters.is_empty() {
        steps.push(Step::Rel(component.relational_filters.clone()));
    }
    for hop in component.graph_traversals.iter().filter(|h| h.target_id.is_some()) {
        steps.push(Step::Graph(hop.clone()));
    }
    for search in &component.embedding_searches {
        steps.push(Step::Vec(search.clone()));
    }
    for hop in component.graph_traversals.iter().filter(|h| h.target_id.is_none()) {
        steps.push(Step::Graph(hop.clone()));
    }
    steps
}

/// `Not` is permitted only as a direct child of an `And` node,
/// wherever that `And` sits in the tree — including an `And` nested
/// inside an `Or`. A free-standing `Not`, or one directly beneath an
/// `Or`, is a query error.
fn validate_not_placement(clause: &Clause, is_direct_child_of_and: bool) -> Result<()> {
    match clause {
        Clause::Not(inner) => {
            if !is_direct_child_of_and {
                return Err(GrizabellaError::Query(
                    "Not is only permitted directly beneath an And".into(),
                ));
            }
            validate_not_placement(inner, false)
        }
        Clause::And(children) => {
            for child in children {
                validate_not_placement(child, true)?;
            }
            Ok(())
        }
        Clause::Or(children) => {
            for child in children {
                validate_not_placement(child, false)?;
            }
            Ok(())
        }
        Clause::Component(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Operator;
    use crate::types::{PropertyDataType, PropertyDefinition, PropertyValue};

    fn registry_with_paper() -> Registry {
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
        registry
    }

    #[test]
    fn rejects_unknown_property_filter() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::from_components(vec![Component::new("Paper")
            .with_filter(RelFilter::eq("bogus", PropertyValue::Integer(1)))]);
        assert!(planner.plan(&query).is_err());
    }

    #[test]
    fn rejects_type_mismatched_filter() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::from_components(vec![Component::new("Paper")
            .with_filter(RelFilter::new("year", Operator::Eq, PropertyValue::Text("x".into())))]);
        assert!(planner.plan(&query).is_err());
    }

    #[test]
    fn rejects_freestanding_not() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::new(Clause::not(Component::new("Paper").into()));
        assert!(planner.plan(&query).is_err());
    }

    #[test]
    fn accepts_not_directly_under_top_level_and() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::new(Clause::and(vec![
            Component::new("Paper").into(),
            Clause::not(Component::new("Paper").into()),
        ]));
        assert!(planner.plan(&query).is_ok());
    }

    #[test]
    fn rejects_not_nested_inside_or() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::new(Clause::and(vec![Clause::or(vec![
            Component::new("Paper").into(),
            Clause::not(Component::new("Paper").into()),
        ])]));
        assert!(planner.plan(&query).is_err());
    }

    #[test]
    fn accepts_not_directly_under_and_nested_inside_or() {
        let registry = registry_with_paper();
        let planner = Planner::new(&registry);
        let query = Query::new(Clause::or(vec![
            Clause::and(vec![Component::new("Paper").into(), Component::new("Paper").into()]),
            Clause::and(vec![
                Component::new("Paper").into(),
                Clause::not(Component::new("Paper").into()),
            ]),
        ]));
        assert!(planner.plan(&query).is_ok());
    }
}
