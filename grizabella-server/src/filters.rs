//! Filter-expression parsing shared by the object/relation/query routes,
//! mirroring `grizabella-cli::utils::parse_filter`'s grammar.

use grizabella::prelude::*;

fn parse_operator(s: &str) -> Result<Operator> {
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

/// Parse a `property:operator:value` filter expression.
pub fn parse_filter(expr: &str) -> Result<RelFilter> {
    let mut parts = expr.splitn(3, ':');
    let (property, operator, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(o), Some(v)) => (p, o, v),
        _ => return Err(GrizabellaError::Validation(format!("filter '{}' must be 'property:operator:value'", expr))),
    };
    let operator = parse_operator(operator)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(RelFilter::new(property, operator, json_to_property_value(value)))
}

/// Parse a comma-separated list of `property:operator:value` expressions,
/// as carried in a query-string `filter` parameter.
pub fn parse_filter_list(raw: Option<&str>) -> Result<Vec<RelFilter>> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.is_empty() => Ok(Vec::new()),
        Some(s) => s.split(',').map(parse_filter).collect(),
    }
}

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
