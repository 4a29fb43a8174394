//! Tree and schema construction helpers shared by the integration tests.
//!
//! Trees are hand-built with explicit byte offsets against the literal
//! source strings the tests use; parsing is a host concern and stays out
//! of this crate.

#![allow(dead_code)]

use docvet_validation::Schema;
use docvet_yaml::{AnnotatedNode, MappingEntry};
use yaml_rust2::Yaml;

pub fn str_node(value: &str, start: usize, end: usize) -> AnnotatedNode {
    AnnotatedNode::scalar(Yaml::String(value.to_string()), start, end)
}

pub fn int_node(value: i64, start: usize, end: usize) -> AnnotatedNode {
    AnnotatedNode::scalar(Yaml::Integer(value), start, end)
}

pub fn bool_node(value: bool, start: usize, end: usize) -> AnnotatedNode {
    AnnotatedNode::scalar(Yaml::Boolean(value), start, end)
}

/// A mapping key node; the span is derived from the name's length.
pub fn key(name: &str, start: usize) -> AnnotatedNode {
    str_node(name, start, start + name.len())
}

pub fn entry(key_node: AnnotatedNode, value: AnnotatedNode) -> MappingEntry {
    MappingEntry::new(key_node, value)
}

pub fn schema_from(value: serde_json::Value) -> Schema {
    serde_json::from_value(value).expect("test schema must deserialize")
}
