use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

pub fn dejsonify<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    serde_json::from_str(json)
}

/// Compact json with every object's keys in lexicographic order, so the same
/// instance or solution always prints the same bytes.
pub fn jsonify<T: Serialize>(obj: &T) -> serde_json::Result<String> {
    serde_json::to_string(&sort_keys(serde_json::to_value(obj)?))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut entries: Vec<(String, Value)> = obj.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
