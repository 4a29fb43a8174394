//! Reduction-engine behavior over the full pipeline: grouping, pruning,
//! narrowing and heading composition.

mod common;

use common::{entry, int_node, key, schema_from, str_node};
use docvet_source_map::MappedSource;
use docvet_validation::{
    CompiledSchema, InstancePath, Keyword, NativeEngine, RawViolation, SchemaPath, SchemaRegistry,
    SchemaValidator, ValidationEngine, localize_and_prune,
};
use docvet_yaml::AnnotatedNode;
use serde_json::json;

fn validator(schema: serde_json::Value) -> SchemaValidator {
    SchemaValidator::new(schema_from(schema), SchemaRegistry::new(), &NativeEngine)
        .expect("schema compiles")
}

#[test]
fn additional_properties_narrow_to_a_keyed_unknown_property_error() {
    // a: ok
    // b: 1
    let source = MappedSource::new("a: ok\nb: 1\n");
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("a", 0), str_node("ok", 3, 5)),
            entry(key("b", 6), int_node(1, 9, 10)),
        ],
        0,
        10,
    );
    let validator = validator(json!({
        "type": "object",
        "properties": {"a": {"type": "string"}},
        "additionalProperties": false,
    }));

    let result = validator.validate(&source, &root).unwrap();
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.instance_path.to_string(), "/b");
    assert_eq!(error.violation.keyword, Keyword::InvalidProperty);
    assert_eq!(error.nice_error.title, "property b not allowed in object");
    // the highlighted span is the key itself, not its value
    assert_eq!(
        (error.violating_node.start, error.violating_node.end),
        (6, 7)
    );
    assert_eq!(
        (error.location.start.row, error.location.start.column),
        (1, 0)
    );
}

#[test]
fn one_of_narrows_to_the_branch_that_failed_only_on_unexpected_properties() {
    // section: intro
    // extra: 1
    let source = MappedSource::new("section: intro\nextra: 1\n");
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("section", 0), str_node("intro", 9, 14)),
            entry(key("extra", 15), int_node(1, 22, 23)),
        ],
        0,
        23,
    );
    let validator = validator(json!({
        "oneOf": [
            {
                "type": "object",
                "properties": {"section": {"type": "string"}},
                "additionalProperties": false,
            },
            {
                "type": "object",
                "properties": {"href": {"type": "string"}, "text": {"type": "string"}},
                "additionalProperties": false,
            },
        ]
    }));

    let result = validator.validate(&source, &root).unwrap();
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.instance_path.to_string(), "/extra");
    assert_eq!(error.violation.keyword, Keyword::InvalidProperty);
    assert_eq!(error.violating_node.start, 15);
}

#[test]
fn one_of_without_a_clean_branch_reports_nothing() {
    // Known information loss, preserved deliberately: when every branch
    // of a failing oneOf also fails for reasons other than unexpected
    // properties, the violation is discarded without replacement and
    // this instance path surfaces no diagnostic at all.
    let source = MappedSource::new("y: 1\n");
    let root = AnnotatedNode::mapping(vec![entry(key("y", 0), int_node(1, 3, 4))], 0, 4);
    let validator = validator(json!({
        "oneOf": [
            {"type": "object", "required": ["x"], "additionalProperties": false},
            {"type": "string"},
        ]
    }));

    let result = validator.validate(&source, &root).unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn duplicate_keys_localize_to_the_last_occurrence() {
    // x: 1
    // x: 2
    let source = MappedSource::new("x: 1\nx: 2\n");
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("x", 0), int_node(1, 3, 4)),
            entry(key("x", 5), int_node(2, 8, 9)),
        ],
        0,
        9,
    );
    let validator = validator(json!({
        "type": "object",
        "properties": {"x": {"type": "string", "description": "be a string"}},
    }));

    let result = validator.validate(&source, &root).unwrap();
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.violating_node.start, 8);
    assert_eq!(error.nice_error.title, "The value \"2\" must be a string.");
    assert_eq!(
        (error.location.start.row, error.location.start.column),
        (1, 3)
    );
}

#[test]
fn ancestor_errors_are_pruned_and_results_are_ordered() {
    // a:
    //   b: 1
    // c: 2
    let source = MappedSource::new("a:\n  b: 1\nc: 2\n");
    let inner = AnnotatedNode::mapping(vec![entry(key("b", 5), int_node(1, 8, 9))], 5, 9);
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("a", 0), inner),
            entry(key("c", 10), int_node(2, 13, 14)),
        ],
        0,
        14,
    );
    let validator = validator(json!({
        "type": "object",
        "properties": {
            "a": {
                "type": "object",
                "properties": {"b": {"type": "string"}},
                "required": ["z"],
            },
            "c": {"type": "boolean"},
        }
    }));

    let result = validator.validate(&source, &root).unwrap();
    // the `required` failure at /a is an ancestor of /a/b and is pruned
    let paths: Vec<String> = result
        .errors
        .iter()
        .map(|e| e.instance_path.to_string())
        .collect();
    assert_eq!(paths, vec!["/a/b", "/c"]);
    for a in &result.errors {
        for b in &result.errors {
            assert!(!a.instance_path.is_proper_prefix_of(&b.instance_path));
        }
    }
    let starts: Vec<usize> = result.errors.iter().map(|e| e.violating_node.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn reduction_is_idempotent_on_a_fresh_violation_list() {
    let source = MappedSource::new("a: ok\nb: 1\n");
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("a", 0), str_node("ok", 3, 5)),
            entry(key("b", 6), int_node(1, 9, 10)),
        ],
        0,
        10,
    );
    let schema = schema_from(json!({
        "type": "object",
        "properties": {"a": {"type": "string"}},
        "additionalProperties": false,
    }));
    let registry = SchemaRegistry::new();
    let mut compiled = NativeEngine.compile(&schema, &registry).unwrap();
    assert!(!compiled.validate(&json!({"a": "ok", "b": 1})));
    let raw = compiled.violations().to_vec();

    let first = localize_and_prune(&root, raw.clone(), &source, &schema, &registry).unwrap();
    let second = localize_and_prune(&root, raw, &source, &schema, &registry).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.instance_path, b.instance_path);
        assert_eq!(a.nice_error.title, b.nice_error.title);
        assert_eq!(a.violating_node.start, b.violating_node.start);
    }
}

#[test]
fn top_level_errors_use_the_raw_message() {
    let source = MappedSource::new("hello\n");
    let root = str_node("hello", 0, 5);
    let validator = validator(json!({"type": "object"}));

    let result = validator.validate(&source, &root).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].nice_error.title,
        "(top-level error) must be object"
    );
    assert!(result.errors[0].instance_path.is_empty());
}

#[test]
fn headings_fall_back_when_no_subschema_describes_itself() {
    let source = MappedSource::new("a: x\n");
    let root = AnnotatedNode::mapping(vec![entry(key("a", 0), str_node("x", 3, 4))], 0, 4);
    let schema = schema_from(json!({"properties": {"a": {}}}));
    let registry = SchemaRegistry::new();

    let mut path = InstancePath::root();
    path.push_key("a");
    let violation = RawViolation::new(
        Keyword::Other("format".to_string()),
        path,
        SchemaPath::from_segments(vec![
            "properties".to_string(),
            "a".to_string(),
            "format".to_string(),
        ]),
        "bad format",
    );

    let errors = localize_and_prune(&root, vec![violation], &source, &schema, &registry).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].nice_error.title,
        "Schema #/properties/a/format: bad format"
    );
}

#[test]
fn attached_subschemas_take_precedence_over_navigation() {
    let source = MappedSource::new("a: x\n");
    let root = AnnotatedNode::mapping(vec![entry(key("a", 0), str_node("x", 3, 4))], 0, 4);
    // root schema deliberately knows nothing about /a
    let schema = schema_from(json!({}));
    let registry = SchemaRegistry::new();

    let mut path = InstancePath::root();
    path.push_key("a");
    let violation = RawViolation::new(
        Keyword::Type,
        path,
        SchemaPath::from_segments(vec!["properties".to_string(), "a".to_string(), "type".to_string()]),
        "must be special",
    )
    .with_schema(schema_from(json!({
        "description": "be special",
        "$id": "doc-field-1",
    })));

    let errors = localize_and_prune(&root, vec![violation], &source, &schema, &registry).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].nice_error.title,
        "The value \"x\" must be special (schema id: doc-field-1)."
    );
}

#[test]
fn instance_path_breadcrumb_is_attached() {
    let source = MappedSource::new("a: ok\nb: 1\n").with_file_name("doc.yml");
    let root = AnnotatedNode::mapping(
        vec![
            entry(key("a", 0), str_node("ok", 3, 5)),
            entry(key("b", 6), int_node(1, 9, 10)),
        ],
        0,
        10,
    );
    let validator = validator(json!({
        "type": "object",
        "properties": {
            "a": {"type": "string"},
            "b": {"type": "boolean", "description": "be true or false"},
        },
    }));

    let result = validator.validate(&source, &root).unwrap();
    assert_eq!(result.errors.len(), 1);
    let details: Vec<&str> = result.errors[0]
        .nice_error
        .details
        .iter()
        .map(|d| d.content.as_str())
        .collect();
    assert!(details.iter().any(|d| d.contains("In file doc.yml")));
    assert!(details.iter().any(|d| d.contains("At document path /b")));
}
