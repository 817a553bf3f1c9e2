use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{to_string, to_string_pretty, to_value, Map, Value};

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

pub fn jsonify<T>(obj: &T) -> serde_json::Result<String>
where
    T: Serialize,
{
    to_string(&jsonify_internal(&to_value(obj)?))
}

pub fn jsonify_pretty<T>(obj: &T) -> serde_json::Result<String>
where
    T: Serialize,
{
    to_string_pretty(&jsonify_internal(&to_value(obj)?))
}

/// Recursively sorts object keys so equal values always render to the same string.
pub fn jsonify_internal(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut sorted_map = Map::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), jsonify_internal(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(jsonify_internal).collect()),
        _ => json_value.clone(),
    }
}

pub fn from_json_value<T>(value: Value) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(value)?)
}
