//! Document and query payloads.
//!
//! Both are arbitrary JSON forwarded unmodified to OpenSearch; no schema is
//! enforced locally beyond a document having to be a JSON object.

use serde_json::{Map, Value};

/// A single JSON record submitted to an index.
pub type Document = Value;

/// A search request body.
pub type Query = Value;

/// Look up a value in a document using a dot-separated path (e.g. `"parent.child"`).
///
/// Missing keys, `null` values and paths that run through a non-object all
/// resolve to an empty string.
pub fn get_nested_value(document: &Value, path: &str) -> Value {
    let mut value = document;
    for key in path.split('.') {
        match value {
            Value::Object(map) => match map.get(key) {
                Some(next) => value = next,
                None => return Value::String(String::new()),
            },
            _ => return Value::String(String::new()),
        }
    }

    if value.is_null() {
        Value::String(String::new())
    } else {
        value.clone()
    }
}

/// Flatten nested objects into dot-separated keys.
///
/// Arrays are kept as a single column holding their JSON text.
pub fn flatten_document(document: &Value) -> Map<String, Value> {
    let mut flat = Map::new();
    if let Value::Object(map) = document {
        flatten_into(map, "", &mut flat);
    }
    flat
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(inner) => flatten_into(inner, &full_key, out),
            Value::Array(_) => {
                out.insert(full_key, Value::String(value.to_string()));
            }
            _ => {
                out.insert(full_key, value.clone());
            }
        }
    }
}
