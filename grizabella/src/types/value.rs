//! Typed property values.
//!
//! Property bags arrive keyed by name and conceptually untyped; internally
//! every value is a tagged sum per `PropertyDataType`, with the Schema
//! Registry as the single typing authority for ingress/egress conversions.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The eight property data types a schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyDataType {
    Text,
    Integer,
    Float,
    Boolean,
    #[serde(rename = "DATETIME")]
    DateTime,
    Blob,
    Json,
    Uuid,
}

impl std::fmt::Display for PropertyDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PropertyDataType::Text => "TEXT",
            PropertyDataType::Integer => "INTEGER",
            PropertyDataType::Float => "FLOAT",
            PropertyDataType::Boolean => "BOOLEAN",
            PropertyDataType::DateTime => "DATETIME",
            PropertyDataType::Blob => "BLOB",
            PropertyDataType::Json => "JSON",
            PropertyDataType::Uuid => "UUID",
        };
        write!(f, "{}", s)
    }
}

/// A typed property value: the concrete payload for one `PropertyDataType`.
///
/// Wire form: datetimes as RFC-3339 UTC strings, UUIDs as
/// canonical hex, blobs as base64, JSON as `serde_json::Value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Blob(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
    Null,
}

impl PropertyValue {
    /// The data type this value was declared against.
    pub fn data_type(&self) -> Option<PropertyDataType> {
        match self {
            PropertyValue::Text(_) => Some(PropertyDataType::Text),
            PropertyValue::Integer(_) => Some(PropertyDataType::Integer),
            PropertyValue::Float(_) => Some(PropertyDataType::Float),
            PropertyValue::Boolean(_) => Some(PropertyDataType::Boolean),
            PropertyValue::DateTime(_) => Some(PropertyDataType::DateTime),
            PropertyValue::Blob(_) => Some(PropertyDataType::Blob),
            PropertyValue::Json(_) => Some(PropertyDataType::Json),
            PropertyValue::Uuid(_) => Some(PropertyDataType::Uuid),
            PropertyValue::Null => None,
        }
    }

    /// Whether this value satisfies the given declared data type.
    pub fn matches_type(&self, data_type: PropertyDataType) -> bool {
        match self {
            PropertyValue::Null => true,
            other => other.data_type() == Some(data_type),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Coerce a loosely-typed `serde_json::Value` into a `PropertyValue` for
    /// the given declared data type. This is the ingress conversion the
    /// registry performs on every instance write.
    pub fn coerce(raw: &serde_json::Value, data_type: PropertyDataType) -> Result<Self, String> {
        if raw.is_null() {
            return Ok(PropertyValue::Null);
        }
        match data_type {
            PropertyDataType::Text => raw
                .as_str()
                .map(|s| PropertyValue::Text(s.to_string()))
                .ok_or_else(|| "expected a TEXT (string) value".to_string()),
            PropertyDataType::Integer => raw
                .as_i64()
                .map(PropertyValue::Integer)
                .ok_or_else(|| "expected an INTEGER value".to_string()),
            PropertyDataType::Float => raw
                .as_f64()
                .map(PropertyValue::Float)
                .ok_or_else(|| "expected a FLOAT value".to_string()),
            PropertyDataType::Boolean => raw
                .as_bool()
                .map(PropertyValue::Boolean)
                .ok_or_else(|| "expected a BOOLEAN value".to_string()),
            PropertyDataType::DateTime => raw
                .as_str()
                .ok_or_else(|| "expected a DATETIME (RFC-3339 string) value".to_string())
                .and_then(|s| {
                    DateTime::parse_from_rfc3339(s)
                        .map(|dt| PropertyValue::DateTime(dt.with_timezone(&Utc)))
                        .map_err(|e| format!("malformed DATETIME: {}", e))
                }),
            PropertyDataType::Blob => raw
                .as_str()
                .ok_or_else(|| "expected a BLOB (base64 string) value".to_string())
                .and_then(|s| {
                    base64::engine::general_purpose::STANDARD
                        .decode(s)
                        .map(PropertyValue::Blob)
                        .map_err(|e| format!("malformed BLOB base64: {}", e))
                }),
            PropertyDataType::Json => Ok(PropertyValue::Json(canonicalize_json(raw.clone()))),
            PropertyDataType::Uuid => raw
                .as_str()
                .ok_or_else(|| "expected a UUID string value".to_string())
                .and_then(|s| Uuid::parse_str(s).map_err(|e| format!("malformed UUID: {}", e)))
                .map(PropertyValue::Uuid),
        }
    }

    /// Convert to the wire (JSON) representation.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            PropertyValue::Text(s) => serde_json::Value::String(s.clone()),
            PropertyValue::Integer(i) => serde_json::json!(i),
            PropertyValue::Float(f) => serde_json::json!(f),
            PropertyValue::Boolean(b) => serde_json::Value::Bool(*b),
            PropertyValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            PropertyValue::Blob(bytes) => serde_json::Value::String(
                base64::engine::general_purpose::STANDARD.encode(bytes),
            ),
            PropertyValue::Json(v) => v.clone(),
            PropertyValue::Uuid(id) => serde_json::Value::String(id.to_string()),
            PropertyValue::Null => serde_json::Value::Null,
        }
    }

    /// Partial order used by `>`, `>=`, `<`, `<=` relational operators.
    /// Returns `None` when the two values aren't comparable (different
    /// variants, or a JSON/Blob value which has no intrinsic ordering).
    pub fn partial_compare(&self, other: &PropertyValue) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (PropertyValue::Integer(a), PropertyValue::Integer(b)) => a.partial_cmp(b),
            (PropertyValue::Float(a), PropertyValue::Float(b)) => a.partial_cmp(b),
            (PropertyValue::Integer(a), PropertyValue::Float(b)) => (*a as f64).partial_cmp(b),
            (PropertyValue::Float(a), PropertyValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a.partial_cmp(b),
            (PropertyValue::DateTime(a), PropertyValue::DateTime(b)) => a.partial_cmp(b),
            (PropertyValue::Boolean(a), PropertyValue::Boolean(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// SQL-style `LIKE` match: `%` = any run of characters, `_` = any single
    /// character. Only meaningful for `Text` values.
    pub fn like(&self, pattern: &str) -> bool {
        let PropertyValue::Text(s) = self else {
            return false;
        };
        like_match(s, pattern)
    }

    /// `CONTAINS` semantics: substring match for text, element membership
    /// for a JSON array.
    pub fn contains(&self, needle: &PropertyValue) -> bool {
        match self {
            PropertyValue::Text(s) => match needle {
                PropertyValue::Text(n) => s.contains(n.as_str()),
                _ => false,
            },
            PropertyValue::Json(serde_json::Value::Array(items)) => {
                let needle_json = needle.to_wire();
                items.iter().any(|item| item == &needle_json)
            }
            _ => false,
        }
    }
}

fn canonicalize_json(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut sorted: Vec<(String, serde_json::Value)> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize_json(v)))
                .collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(canonicalize_json).collect())
        }
        other => other,
    }
}

fn like_match(text: &str, pattern: &str) -> bool {
    fn inner(t: &[u8], p: &[u8]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some(b'%') => inner(t, &p[1..]) || (!t.is_empty() && inner(&t[1..], p)),
            Some(b'_') => !t.is_empty() && inner(&t[1..], &p[1..]),
            Some(c) => !t.is_empty() && t[0] == *c && inner(&t[1..], &p[1..]),
        }
    }
    inner(text.as_bytes(), pattern.as_bytes())
}
