//! Relational filter predicates: `(property, operator, value)`
//! triples, supporting `==, !=, >, >=, <, <=, LIKE, IN, CONTAINS`.

use crate::types::PropertyValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    In,
    Contains,
}

/// A single relational filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelFilter {
    pub property: String,
    pub operator: Operator,
    pub value: PropertyValue,
}

impl RelFilter {
    pub fn new(property: impl Into<String>, operator: Operator, value: PropertyValue) -> Self {
        Self {
            property: property.into(),
            operator,
            value,
        }
    }

    pub fn eq(property: impl Into<String>, value: PropertyValue) -> Self {
        Self::new(property, Operator::Eq, value)
    }

    /// Evaluate this filter against a candidate property value. Null
    /// comparisons are only meaningful via `==`/`!=`.
    pub fn matches(&self, candidate: Option<&PropertyValue>) -> bool {
        let candidate = candidate.unwrap_or(&PropertyValue::Null);
        match self.operator {
            Operator::Eq => values_equal(candidate, &self.value),
            Operator::Ne => !values_equal(candidate, &self.value),
            Operator::Gt => candidate
                .partial_compare(&self.value)
                .is_some_and(|o| o == std::cmp::Ordering::Greater),
            Operator::Ge => candidate
                .partial_compare(&self.value)
                .is_some_and(|o| o != std::cmp::Ordering::Less),
            Operator::Lt => candidate
                .partial_compare(&self.value)
                .is_some_and(|o| o == std::cmp::Ordering::Less),
            Operator::Le => candidate
                .partial_compare(&self.value)
                .is_some_and(|o| o != std::cmp::Ordering::Greater),
            Operator::Like => {
                if let PropertyValue::Text(pattern) = &self.value {
                    candidate.like(pattern)
                } else {
                    false
                }
            }
            Operator::In => match &self.value {
                PropertyValue::Json(serde_json::Value::Array(items)) => {
                    let candidate_wire = candidate.to_wire();
                    items.iter().any(|item| item == &candidate_wire)
                }
                _ => false,
            },
            Operator::Contains => candidate.contains(&self.value),
        }
    }
}

fn values_equal(a: &PropertyValue, b: &PropertyValue) -> bool {
    if a.is_null() || b.is_null() {
        return a.is_null() && b.is_null();
    }
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_only_comparable_via_eq_ne() {
        let filter = RelFilter::new("x", Operator::Eq, PropertyValue::Null);
        assert!(filter.matches(None));
        let filter = RelFilter::new("x", Operator::Gt, PropertyValue::Integer(1));
        assert!(!filter.matches(None));
    }

    #[test]
    fn in_operator_checks_membership() {
        let filter = RelFilter::new(
            "year",
            Operator::In,
            PropertyValue::Json(serde_json::json!([2022, 2023])),
        );
        assert!(filter.matches(Some(&PropertyValue::Integer(2023))));
        assert!(!filter.matches(Some(&PropertyValue::Integer(2010))));
    }
}
