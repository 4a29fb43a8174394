//! The reference validation engine.
//!
//! A complete implementation of the engine contract: walks the schema
//! model against a decoded document value and reports *every* violation
//! it can find, in document order. Exhaustiveness is deliberate —
//! editor hosts squiggle all of it, and the reduction engine distills
//! it for terminal reporting — so nothing here stops at the first
//! failure.
//!
//! Path conventions match what the reduction engine expects: `$ref`
//! dereferences without consuming schema-path segments, `allOf` members
//! validate without advancing the schema path (the schema navigator
//! compensates by fanning out), `anyOf`/`oneOf` push indexed branch
//! segments, and `additionalProperties` offenders are reported at the
//! *object's* instance path with the property name in params.

use regex::Regex;
use serde_json::{Map, Value};

use crate::engine::{CompileError, CompiledSchema, ValidationEngine};
use crate::schema::{AdditionalProperties, Schema, SchemaRegistry};
use crate::violation::{InstancePath, Keyword, RawViolation, SchemaPath, ViolationParams};

/// The built-in [`ValidationEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl ValidationEngine for NativeEngine {
    fn compile(
        &self,
        schema: &Schema,
        registry: &SchemaRegistry,
    ) -> Result<Box<dyn CompiledSchema + Send>, CompileError> {
        check_compilable(schema, registry, &mut Vec::new())?;
        Ok(Box::new(NativeValidator {
            schema: schema.clone(),
            registry: registry.clone(),
            errors: Vec::new(),
        }))
    }
}

/// Verify every `$ref` resolves and every pattern compiles, so schema
/// defects surface at construction rather than mid-validation.
fn check_compilable<'a>(
    schema: &'a Schema,
    registry: &'a SchemaRegistry,
    visiting: &mut Vec<&'a str>,
) -> Result<(), CompileError> {
    if let Some(reference) = &schema.reference {
        if visiting.iter().any(|seen| *seen == reference.as_str()) {
            return Ok(()); // reference cycles are legal
        }
        let Some(resolved) = registry.resolve(reference) else {
            return Err(CompileError::UnresolvedReference {
                reference: reference.clone(),
            });
        };
        visiting.push(reference.as_str());
        check_compilable(resolved, registry, visiting)?;
        visiting.pop();
    }
    if let Some(pattern) = &schema.pattern {
        compile_pattern(pattern)?;
    }
    if let Some(patterns) = &schema.pattern_properties {
        for (pattern, sub) in patterns {
            compile_pattern(pattern)?;
            check_compilable(sub, registry, visiting)?;
        }
    }
    for member in schema
        .all_of
        .iter()
        .flatten()
        .chain(schema.any_of.iter().flatten())
        .chain(schema.one_of.iter().flatten())
    {
        check_compilable(member, registry, visiting)?;
    }
    for sub in schema.properties.iter().flat_map(|m| m.values()) {
        check_compilable(sub, registry, visiting)?;
    }
    if let Some(items) = &schema.items {
        check_compilable(items, registry, visiting)?;
    }
    if let Some(AdditionalProperties::Schema(sub)) = &schema.additional_properties {
        check_compilable(sub, registry, visiting)?;
    }
    Ok(())
}

fn compile_pattern(pattern: &str) -> Result<Regex, CompileError> {
    Regex::new(pattern).map_err(|error| CompileError::InvalidPattern {
        pattern: pattern.to_string(),
        message: error.to_string(),
    })
}

struct NativeValidator {
    schema: Schema,
    registry: SchemaRegistry,
    /// The last run's violations — validator state, not call state,
    /// which is why the orchestrator serializes calls per instance.
    errors: Vec<RawViolation>,
}

impl CompiledSchema for NativeValidator {
    fn validate(&mut self, value: &Value) -> bool {
        let mut walker = Walker {
            registry: &self.registry,
            instance_path: InstancePath::root(),
            schema_path: SchemaPath::root(),
            errors: Vec::new(),
        };
        walker.check(value, &self.schema);
        self.errors = walker.errors;
        self.errors.is_empty()
    }

    fn violations(&self) -> &[RawViolation] {
        &self.errors
    }
}

struct Walker<'a> {
    registry: &'a SchemaRegistry,
    instance_path: InstancePath,
    schema_path: SchemaPath,
    errors: Vec<RawViolation>,
}

impl<'a> Walker<'a> {
    fn report(
        &mut self,
        keyword: Keyword,
        trailing: &str,
        message: String,
        params: ViolationParams,
        parent: &Schema,
    ) {
        let mut schema_path = self.schema_path.clone();
        schema_path.push(trailing);
        self.errors.push(
            RawViolation::new(keyword, self.instance_path.clone(), schema_path, message)
                .with_params(params)
                .with_parent_schema(parent.clone()),
        );
    }

    fn branch_walker(&self) -> Walker<'a> {
        Walker {
            registry: self.registry,
            instance_path: self.instance_path.clone(),
            schema_path: self.schema_path.clone(),
            errors: Vec::new(),
        }
    }

    fn check(&mut self, value: &Value, schema: &Schema) {
        if let Some(reference) = &schema.reference {
            // dereference without consuming schema-path segments
            if let Some(resolved) = self.registry.resolve(reference) {
                self.check(value, resolved);
            }
            return;
        }
        if let Some(members) = &schema.all_of {
            // the schema path does not advance through allOf
            for member in members {
                self.check(value, member);
            }
        }
        if let Some(members) = &schema.any_of {
            self.check_any_of(value, members, schema);
        }
        if let Some(members) = &schema.one_of {
            self.check_one_of(value, members, schema);
        }
        if let Some(expected) = &schema.schema_type
            && !type_matches(expected, value)
        {
            self.report(
                Keyword::Type,
                "type",
                format!("must be {}", expected),
                ViolationParams::ExpectedType {
                    expected: expected.clone(),
                },
                schema,
            );
        }
        if let Some(allowed) = &schema.enum_values
            && !allowed.contains(value)
        {
            self.report(
                Keyword::Enum,
                "enum",
                "must be equal to one of the allowed values".to_string(),
                ViolationParams::AllowedValues {
                    allowed: allowed.clone(),
                },
                schema,
            );
        }
        // constraints apply only to values of their type; a `minimum`
        // says nothing about a string
        match value {
            Value::Object(object) => self.check_object(object, schema),
            Value::Array(items) => self.check_array(items, schema),
            Value::String(s) => self.check_string(s, schema),
            Value::Number(number) => {
                self.check_number(number.as_f64().unwrap_or(f64::NAN), schema);
            }
            Value::Bool(_) | Value::Null => {}
        }
    }

    fn check_object(&mut self, object: &Map<String, Value>, schema: &Schema) {
        if let Some(required) = &schema.required {
            for property in required {
                if !object.contains_key(property) {
                    self.report(
                        Keyword::Required,
                        "required",
                        format!("must have required property '{}'", property),
                        ViolationParams::MissingProperty {
                            property: property.clone(),
                        },
                        schema,
                    );
                }
            }
        }
        for (name, value) in object {
            let mut matched = false;
            if let Some(properties) = &schema.properties
                && let Some(sub) = properties.get(name)
            {
                matched = true;
                self.descend_property("properties", name, name, value, sub);
            }
            if let Some(patterns) = &schema.pattern_properties {
                for (pattern, sub) in patterns {
                    if let Ok(re) = Regex::new(pattern)
                        && re.is_match(name)
                    {
                        matched = true;
                        self.descend_property("patternProperties", pattern, name, value, sub);
                    }
                }
            }
            if !matched {
                match &schema.additional_properties {
                    Some(AdditionalProperties::Allowed(false)) => {
                        // reported at the object, not the property; the
                        // reduction engine synthesizes the keyed diagnostic
                        self.report(
                            Keyword::AdditionalProperties,
                            "additionalProperties",
                            "must NOT have additional properties".to_string(),
                            ViolationParams::AdditionalProperty {
                                property: name.clone(),
                            },
                            schema,
                        );
                    }
                    Some(AdditionalProperties::Schema(sub)) => {
                        self.schema_path.push("additionalProperties");
                        self.instance_path.push_key(name.clone());
                        self.check(value, sub);
                        self.instance_path.pop();
                        self.schema_path.pop();
                    }
                    Some(AdditionalProperties::Allowed(true)) | None => {}
                }
            }
        }
    }

    fn descend_property(
        &mut self,
        kind: &'static str,
        schema_segment: &str,
        key: &str,
        value: &Value,
        sub: &Schema,
    ) {
        self.schema_path.push(kind);
        self.schema_path.push(schema_segment);
        self.instance_path.push_key(key);
        self.check(value, sub);
        self.instance_path.pop();
        self.schema_path.pop();
        self.schema_path.pop();
    }

    fn check_array(&mut self, items: &[Value], schema: &Schema) {
        if let Some(min) = schema.min_items
            && items.len() < min
        {
            self.report(
                Keyword::MinItems,
                "minItems",
                format!("must NOT have fewer than {} items", min),
                ViolationParams::None,
                schema,
            );
        }
        if let Some(max) = schema.max_items
            && items.len() > max
        {
            self.report(
                Keyword::MaxItems,
                "maxItems",
                format!("must NOT have more than {} items", max),
                ViolationParams::None,
                schema,
            );
        }
        if let Some(item_schema) = &schema.items {
            for (index, item) in items.iter().enumerate() {
                self.schema_path.push("items");
                self.instance_path.push_index(index);
                self.check(item, item_schema);
                self.instance_path.pop();
                self.schema_path.pop();
            }
        }
    }

    fn check_string(&mut self, s: &str, schema: &Schema) {
        if let Some(min) = schema.min_length
            && s.chars().count() < min
        {
            self.report(
                Keyword::MinLength,
                "minLength",
                format!("must NOT have fewer than {} characters", min),
                ViolationParams::None,
                schema,
            );
        }
        if let Some(max) = schema.max_length
            && s.chars().count() > max
        {
            self.report(
                Keyword::MaxLength,
                "maxLength",
                format!("must NOT have more than {} characters", max),
                ViolationParams::None,
                schema,
            );
        }
        if let Some(pattern) = &schema.pattern
            && let Ok(re) = Regex::new(pattern)
            && !re.is_match(s)
        {
            self.report(
                Keyword::Pattern,
                "pattern",
                format!("must match pattern \"{}\"", pattern),
                ViolationParams::None,
                schema,
            );
        }
    }

    fn check_number(&mut self, number: f64, schema: &Schema) {
        if let Some(min) = schema.minimum
            && number < min
        {
            self.report(
                Keyword::Minimum,
                "minimum",
                format!("must be >= {}", min),
                ViolationParams::None,
                schema,
            );
        }
        if let Some(max) = schema.maximum
            && number > max
        {
            self.report(
                Keyword::Maximum,
                "maximum",
                format!("must be <= {}", max),
                ViolationParams::None,
                schema,
            );
        }
    }

    fn check_any_of(&mut self, value: &Value, members: &[Schema], schema: &Schema) {
        let mut collected = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let mut branch = self.branch_walker();
            branch.schema_path.push("anyOf");
            branch.schema_path.push(index.to_string());
            branch.check(value, member);
            if branch.errors.is_empty() {
                return; // a passing branch absolves the others
            }
            collected.extend(branch.errors);
        }
        self.errors.extend(collected);
        self.report(
            Keyword::AnyOf,
            "anyOf",
            "must match a schema in anyOf".to_string(),
            ViolationParams::None,
            schema,
        );
    }

    fn check_one_of(&mut self, value: &Value, members: &[Schema], schema: &Schema) {
        let mut collected = Vec::new();
        let mut passing = 0usize;
        for (index, member) in members.iter().enumerate() {
            let mut branch = self.branch_walker();
            branch.schema_path.push("oneOf");
            branch.schema_path.push(index.to_string());
            branch.check(value, member);
            if branch.errors.is_empty() {
                passing += 1;
            } else {
                collected.extend(branch.errors);
            }
        }
        if passing != 1 {
            self.errors.extend(collected);
            self.report(
                Keyword::OneOf,
                "oneOf",
                "must match exactly one schema in oneOf".to_string(),
                ViolationParams::None,
                schema,
            );
        }
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        // unknown type names are not this engine's to police
        _ => true,
    }
}
