//! Response envelope transform
//!
//! Every outward response destined for a tool call is wrapped as
//! `{status, data}` with object keys recursively rewritten to lowerCamelCase.
//! The origin server applies this uniformly whether the action rendered an
//! explicit payload or relied on an implicit view lookup, so both paths
//! converge on the same envelope shape before serialization.

use convert_case::{Case, Casing};
use serde_json::{json, Map, Value};

/// Wrap a payload in the `{status, data}` envelope with camelized keys
#[must_use]
pub fn wrap(status: u16, data: Value) -> Value {
    json!({
        "status": status,
        "data": camelize_keys(data),
    })
}

/// Recursively rewrite object keys to lowerCamelCase
///
/// Arrays are mapped element-wise; non-container values pass through
/// unchanged.
#[must_use]
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                out.insert(key.to_case(Case::Camel), camelize_keys(inner));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

/// Error envelope for failures surfaced to a tool-calling client
///
/// `code` is conventionally the snake-cased error type name.
#[must_use]
pub fn error_envelope(message: &str, code: &str) -> Value {
    json!({
        "status": "error",
        "message": message,
        "code": code.to_case(Case::Snake),
    })
}
