//! Raw violations and the paths that locate them.
//!
//! A [`RawViolation`] is one unprocessed conformance failure as reported
//! by a validation engine: a keyword, a pointer into the document, a
//! pointer into the schema, and keyword-specific parameters. The
//! reduction engine consumes lists of these and distills them into
//! localized errors.

use serde_json::Value;
use std::fmt;

use crate::schema::Schema;

/// One segment of an instance path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A JSON-Pointer-style path into the validated document.
///
/// Displays as `""` for the root and `/a/0/b` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// This path extended by one mapping key.
    pub fn child_key(&self, key: &str) -> Self {
        let mut child = self.clone();
        child.push_key(key);
        child
    }

    /// Whether `other` points strictly inside the location this path
    /// points at. Compared segment-wise: `/ab` is not an ancestor of
    /// `/abc`.
    pub fn is_proper_prefix_of(&self, other: &Self) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A JSON-Pointer-style path into the schema a violation originates
/// from. Displays as `#` for the root and `#/properties/a` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The path with its final segment dropped; the root stays the root.
    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.pop();
        parent
    }

    /// Segment-wise proper-prefix test, as for [`InstancePath`].
    pub fn is_proper_prefix_of(&self, other: &Self) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// The schema keyword a violation originated from.
///
/// A closed union of the keywords the pipeline distinguishes;
/// engine-specific keywords travel through `Other`. `InvalidProperty`
/// never comes from an engine: the reduction engine synthesizes it when
/// narrowing `additionalProperties` violations down to the offending
/// property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    Type,
    Enum,
    Required,
    AdditionalProperties,
    AnyOf,
    OneOf,
    Minimum,
    Maximum,
    MinLength,
    MaxLength,
    Pattern,
    MinItems,
    MaxItems,
    /// Synthesized unknown-property diagnostic.
    InvalidProperty,
    Other(String),
}

impl Keyword {
    pub fn as_str(&self) -> &str {
        match self {
            Keyword::Type => "type",
            Keyword::Enum => "enum",
            Keyword::Required => "required",
            Keyword::AdditionalProperties => "additionalProperties",
            Keyword::AnyOf => "anyOf",
            Keyword::OneOf => "oneOf",
            Keyword::Minimum => "minimum",
            Keyword::Maximum => "maximum",
            Keyword::MinLength => "minLength",
            Keyword::MaxLength => "maxLength",
            Keyword::Pattern => "pattern",
            Keyword::MinItems => "minItems",
            Keyword::MaxItems => "maxItems",
            Keyword::InvalidProperty => "invalidProperty",
            Keyword::Other(name) => name,
        }
    }

    /// Whether this keyword was produced by the reduction engine rather
    /// than a validation engine. Synthesized violations carry a prepared
    /// message that is used verbatim.
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Keyword::InvalidProperty)
    }
}

/// Keyword-specific violation data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViolationParams {
    #[default]
    None,
    /// The property rejected by `additionalProperties`.
    AdditionalProperty { property: String },
    /// The property a `required` check found missing.
    MissingProperty { property: String },
    /// The values an `enum` permits.
    AllowedValues { allowed: Vec<Value> },
    /// The type a `type` check expected.
    ExpectedType { expected: String },
}

/// One unprocessed conformance failure reported by a validation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawViolation {
    pub keyword: Keyword,
    pub instance_path: InstancePath,
    pub schema_path: SchemaPath,
    pub message: String,
    pub params: ViolationParams,
    /// The failing subschema, when the engine attaches it; preferred
    /// over schema-path navigation when composing headings.
    pub schema: Option<Schema>,
    /// The schema containing the failing keyword, when attached.
    pub parent_schema: Option<Schema>,
}

impl RawViolation {
    pub fn new(
        keyword: Keyword,
        instance_path: InstancePath,
        schema_path: SchemaPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword,
            instance_path,
            schema_path,
            message: message.into(),
            params: ViolationParams::None,
            schema: None,
            parent_schema: None,
        }
    }

    pub fn with_params(mut self, params: ViolationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_parent_schema(mut self, schema: Schema) -> Self {
        self.parent_schema = Some(schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_path_displays_as_json_pointer() {
        let mut path = InstancePath::root();
        assert_eq!(path.to_string(), "");
        path.push_key("format");
        path.push_index(0);
        path.push_key("toc");
        assert_eq!(path.to_string(), "/format/0/toc");
    }

    #[test]
    fn schema_path_displays_with_root_marker() {
        let mut path = SchemaPath::root();
        assert_eq!(path.to_string(), "#");
        path.push("properties");
        path.push("format");
        assert_eq!(path.to_string(), "#/properties/format");
        assert_eq!(path.parent().to_string(), "#/properties");
        assert_eq!(SchemaPath::root().parent(), SchemaPath::root());
    }

    #[test]
    fn proper_prefix_is_segment_wise() {
        let mut shallow = InstancePath::root();
        shallow.push_key("ab");
        let mut deep = InstancePath::root();
        deep.push_key("ab");
        deep.push_key("c");
        let mut lookalike = InstancePath::root();
        lookalike.push_key("abc");

        assert!(shallow.is_proper_prefix_of(&deep));
        assert!(!shallow.is_proper_prefix_of(&lookalike));
        assert!(!shallow.is_proper_prefix_of(&shallow));
        assert!(InstancePath::root().is_proper_prefix_of(&deep));
    }

    #[test]
    fn synthesized_keyword_is_marked() {
        assert!(Keyword::InvalidProperty.is_synthesized());
        assert!(!Keyword::AdditionalProperties.is_synthesized());
        assert!(!Keyword::Other("custom".to_string()).is_synthesized());
    }
}
