//! Decoded-value conversion at the engine boundary.

use serde_json::Value;
use yaml_rust2::Yaml;

/// Convert a decoded YAML value to a JSON value.
///
/// Duplicate mapping keys already collapsed to the last occurrence in
/// `Yaml::Hash`; non-string keys are skipped, aliases should have been
/// resolved by the parser and decode to null.
pub fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null | Yaml::BadValue => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(n) => Value::Number((*n).into()),
        Yaml::Real(raw) => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(entries) => {
            let mut map = serde_json::Map::new();
            for (key, value) in entries {
                if let Yaml::String(key) = key {
                    map.insert(key.clone(), yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
        Yaml::Alias(_) => Value::Null,
    }
}
