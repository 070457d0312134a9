//! Parsing helpers shared across command handlers.

use grizabella::prelude::*;
use std::fs;

/// Read a JSON argument: `@path` reads the file at `path`, anything else is
/// parsed as an inline JSON literal.
pub fn read_json_arg(arg: &str) -> Result<serde_json::Value> {
    let raw = if let Some(path) = arg.strip_prefix('@') {
        fs::read_to_string(path)
            .map_err(|e| GrizabellaError::Validation(format!("failed to read '{}': {}", path, e)))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&raw).map_err(|e| GrizabellaError::Validation(format!("invalid JSON: {}", e)))
}

/// Coerce a loose JSON object into a typed property bag for `object_type`,
/// using the registry's declared property types as the coercion authority.
pub fn coerce_properties(
    object_type: &ObjectTypeDefinition,
    raw: &serde_json::Value,
) -> Result<std::collections::HashMap<String, PropertyValue>> {
    let obj = raw
        .as_object()
        .ok_or_else(|| GrizabellaError::Validation("properties must be a JSON object".to_string()))?;
    let mut properties = std::collections::HashMap::new();
    for prop in &object_type.properties {
        if let Some(value) = obj.get(&prop.name) {
            let coerced = PropertyValue::coerce(value, prop.data_type).map_err(GrizabellaError::Validation)?;
            properties.insert(prop.name.clone(), coerced);
        }
    }
    for key in obj.keys() {
        if !object_type.properties.iter().any(|p| &p.name == key) {
            return Err(GrizabellaError::Validation(format!(
                "'{}' declares no property named '{}'",
                object_type.name, key
            )));
        }
    }
    Ok(properties)
}

pub fn coerce_relation_properties(
    relation_type: &RelationTypeDefinition,
    raw: &serde_json::Value,
) -> Result<std::collections::HashMap<String, PropertyValue>> {
    let obj = raw
        .as_object()
        .ok_or_else(|| GrizabellaError::Validation("properties must be a JSON object".to_string()))?;
    let mut properties = std::collections::HashMap::new();
    for prop in &relation_type.properties {
        if let Some(value) = obj.get(&prop.name) {
            let coerced = PropertyValue::coerce(value, prop.data_type).map_err(GrizabellaError::Validation)?;
            properties.insert(prop.name.clone(), coerced);
        }
    }
    Ok(properties)
}

pub fn parse_operator(s: &str) -> Result<Operator> {
    match s.to_ascii_lowercase().as_str() {
        "eq" | "==" => Ok(Operator::Eq),
        "ne" | "!=" => Ok(Operator::Ne),
        "gt" | ">" => Ok(Operator::Gt),
        "ge" | ">=" => Ok(Operator::Ge),
        "lt" | "<" => Ok(Operator::Lt),
        "le" | "<=" => Ok(Operator::Le),
        "like" => Ok(Operator::Like),
        "in" => Ok(Operator::In),
        "contains" => Ok(Operator::Contains),
        other => Err(GrizabellaError::Validation(format!("unknown filter operator '{}'", other))),
    }
}

fn json_to_property_value(value: serde_json::Value) -> PropertyValue {
    match value {
        serde_json::Value::Null => PropertyValue::Null,
        serde_json::Value::Bool(b) => PropertyValue::Boolean(b),
        serde_json::Value::String(s) => PropertyValue::Text(s),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                PropertyValue::Integer(i)
            } else {
                PropertyValue::Float(n.as_f64().unwrap_or_default())
            }
        }
        other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => PropertyValue::Json(other),
    }
}

/// Parse a `property:operator:value` filter expression, e.g. `year:gt:2010`
/// or `tags:in:["a","b"]`. `value` is parsed as JSON when possible, else
/// treated as a bare string.
pub fn parse_filter(expr: &str) -> Result<RelFilter> {
    let mut parts = expr.splitn(3, ':');
    let (property, operator, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(o), Some(v)) => (p, o, v),
        _ => {
            return Err(GrizabellaError::Validation(format!(
                "filter '{}' must be 'property:operator:value'",
                expr
            )))
        }
    };
    let operator = parse_operator(operator)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(RelFilter::new(property, operator, json_to_property_value(value)))
}

pub fn parse_direction(s: &str) -> Result<Direction> {
    match s.to_ascii_lowercase().as_str() {
        "out" | "outgoing" => Ok(Direction::Outgoing),
        "in" | "incoming" => Ok(Direction::Incoming),
        other => Err(GrizabellaError::Validation(format!("unknown direction '{}'", other))),
    }
}
