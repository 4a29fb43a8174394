//! The schema model, the registry, and schema-path navigation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// A document schema: a recursive set of optional JSON-Schema keywords.
///
/// Modeled as one struct rather than a variant per shape because real
/// schemas combine keywords — `allOf` beside `properties`, a `type` with
/// scalar constraints — and the navigator inspects keyword presence
/// independently of path position. Schemas are immutable once
/// registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Stable identifier, surfaced in diagnostics when present.
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name reference into a schema registry.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Natural-language fragment completing "The value ... must ...".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<BTreeMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// The `additionalProperties` keyword: a blanket permission or a schema
/// extra properties must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// Named schema definitions for `$ref` resolution.
///
/// Deliberately minimal: how definitions are authored and loaded is the
/// host's concern.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    definitions: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, schema: Schema) {
        self.definitions.insert(name.into(), schema);
    }

    pub fn resolve(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }
}

/// Resolve a schema path to the concrete subschema(s) it denotes.
///
/// The final path segment is the failing keyword itself and is never
/// consumed; navigation stops once fewer than two segments remain, so
/// `properties/a/type` resolves to the schema at `properties/a`.
///
/// `allOf` needs special handling: engines do not advance the schema
/// path through it, so when the current schema is an `allOf` every
/// member is a candidate for the same remaining path and the results are
/// concatenated. Anything unrecognized — an unknown segment, a missing
/// property name, an unresolvable `$ref` — yields an empty result,
/// signaling "opaque, compose a generic message" rather than an error.
pub fn navigate_schema<'a>(
    path: &[String],
    schema: &'a Schema,
    registry: &'a SchemaRegistry,
) -> Vec<&'a Schema> {
    navigate_from(path, 0, schema, registry)
}

fn navigate_from<'a>(
    path: &[String],
    index: usize,
    schema: &'a Schema,
    registry: &'a SchemaRegistry,
) -> Vec<&'a Schema> {
    let mut schema = schema;
    if let Some(name) = &schema.reference {
        match registry.resolve(name) {
            Some(resolved) => schema = resolved,
            None => return Vec::new(),
        }
    }
    if index + 1 >= path.len() {
        return vec![schema];
    }
    if let Some(members) = &schema.all_of {
        return members
            .iter()
            .flat_map(|member| navigate_from(path, index, member, registry))
            .collect();
    }
    match path[index].as_str() {
        "properties" => {
            if let Some(properties) = &schema.properties
                && let Some(sub) = properties.get(&path[index + 1])
            {
                return navigate_from(path, index + 2, sub, registry);
            }
        }
        "patternProperties" => {
            if let Some(patterns) = &schema.pattern_properties
                && let Some(sub) = patterns.get(&path[index + 1])
            {
                return navigate_from(path, index + 2, sub, registry);
            }
        }
        "anyOf" => {
            if let Some(members) = &schema.any_of
                && let Ok(branch) = path[index + 1].parse::<usize>()
                && let Some(sub) = members.get(branch)
            {
                return navigate_from(path, index + 2, sub, registry);
            }
        }
        "oneOf" => {
            if let Some(members) = &schema.one_of
                && let Ok(branch) = path[index + 1].parse::<usize>()
                && let Some(sub) = members.get(branch)
            {
                return navigate_from(path, index + 2, sub, registry);
            }
        }
        "items" => {
            if let Some(items) = &schema.items {
                return navigate_from(path, index + 1, items, registry);
            }
        }
        _ => {}
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_json_schema_field_names() {
        let s = schema(json!({
            "$id": "thing",
            "type": "object",
            "properties": {"a": {"type": "string", "minLength": 2}},
            "additionalProperties": false,
            "patternProperties": {"^x-": {"type": "number"}},
        }));
        assert_eq!(s.id.as_deref(), Some("thing"));
        assert_eq!(s.schema_type.as_deref(), Some("object"));
        assert_eq!(
            s.properties.as_ref().unwrap()["a"].min_length,
            Some(2)
        );
        assert_eq!(
            s.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        );
        assert!(s.pattern_properties.unwrap().contains_key("^x-"));
    }

    #[test]
    fn navigation_stops_before_the_failing_keyword() {
        let root = schema(json!({
            "properties": {"a": {"type": "string", "description": "be a string"}}
        }));
        let registry = SchemaRegistry::new();
        let found = navigate_schema(&segments(&["properties", "a", "type"]), &root, &registry);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some("be a string"));
    }

    #[test]
    fn all_of_fans_out_over_every_member() {
        let root = schema(json!({
            "allOf": [
                {"properties": {"x": {"description": "first"}}},
                {"properties": {"x": {"description": "second"}}},
            ]
        }));
        let registry = SchemaRegistry::new();
        let found = navigate_schema(&segments(&["properties", "x", "type"]), &root, &registry);
        let descriptions: Vec<_> = found.iter().filter_map(|s| s.description.as_deref()).collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }

    #[test]
    fn combinator_segments_are_indexed() {
        let root = schema(json!({
            "oneOf": [
                {"description": "zeroth"},
                {"properties": {"y": {"description": "inner"}}},
            ]
        }));
        let registry = SchemaRegistry::new();
        let found = navigate_schema(
            &segments(&["oneOf", "1", "properties", "y", "type"]),
            &root,
            &registry,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some("inner"));
    }

    #[test]
    fn items_consumes_a_single_segment() {
        let root = schema(json!({
            "items": {"description": "an element"}
        }));
        let registry = SchemaRegistry::new();
        let found = navigate_schema(&segments(&["items", "type"]), &root, &registry);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some("an element"));
    }

    #[test]
    fn references_are_dereferenced_first() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "base",
            schema(json!({"properties": {"a": {"description": "via ref"}}})),
        );
        let root = schema(json!({"$ref": "base"}));
        let found = navigate_schema(&segments(&["properties", "a", "type"]), &root, &registry);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some("via ref"));
    }

    #[test]
    fn unrecognized_segments_yield_nothing() {
        let root = schema(json!({"properties": {"a": {}}}));
        let registry = SchemaRegistry::new();
        assert!(navigate_schema(&segments(&["contains", "0", "type"]), &root, &registry).is_empty());
        assert!(
            navigate_schema(&segments(&["properties", "missing", "type"]), &root, &registry)
                .is_empty()
        );
        let dangling = schema(json!({"$ref": "nowhere"}));
        assert!(navigate_schema(&segments(&["type"]), &dangling, &registry).is_empty());
    }

    #[test]
    fn exhausted_and_single_segment_paths_return_the_schema() {
        let root = schema(json!({"description": "whole"}));
        let registry = SchemaRegistry::new();
        assert_eq!(navigate_schema(&[], &root, &registry).len(), 1);
        assert_eq!(navigate_schema(&segments(&["type"]), &root, &registry).len(), 1);
    }
}
