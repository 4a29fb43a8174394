//! Document tree with byte-span tracking.

use yaml_rust2::Yaml;

/// The structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
}

/// A decoded document node annotated with its source byte span.
///
/// `yaml` is the complete decoded value of the subtree rooted here; the
/// children structure mirrors it with span information per child. For a
/// mapping the decoded `Yaml::Hash` necessarily collapses duplicate keys
/// (last occurrence wins, matching validator semantics), while `entries`
/// retains every occurrence in source order.
#[derive(Debug, Clone)]
pub struct AnnotatedNode {
    /// The decoded value of this subtree.
    pub yaml: Yaml,
    /// Byte offset of the first character of this node.
    pub start: usize,
    /// Byte offset one past the last character of this node.
    pub end: usize,
    children: Children,
}

#[derive(Debug, Clone)]
enum Children {
    None,
    Sequence(Vec<AnnotatedNode>),
    Mapping(Vec<MappingEntry>),
}

/// One key/value pair of a mapping node, spans tracked on both sides.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub key: AnnotatedNode,
    pub value: AnnotatedNode,
}

impl MappingEntry {
    pub fn new(key: AnnotatedNode, value: AnnotatedNode) -> Self {
        Self { key, value }
    }
}

impl AnnotatedNode {
    /// A leaf node.
    pub fn scalar(yaml: Yaml, start: usize, end: usize) -> Self {
        Self {
            yaml,
            start,
            end,
            children: Children::None,
        }
    }

    /// A sequence node; the decoded value is assembled from the children.
    pub fn sequence(items: Vec<AnnotatedNode>, start: usize, end: usize) -> Self {
        let yaml = Yaml::Array(items.iter().map(|item| item.yaml.clone()).collect());
        Self {
            yaml,
            start,
            end,
            children: Children::Sequence(items),
        }
    }

    /// A mapping node; the decoded value is assembled from the entries.
    ///
    /// When a key occurs more than once, the assembled `Yaml::Hash` keeps
    /// the last occurrence's value, which is the occurrence validators
    /// treat as authoritative.
    pub fn mapping(entries: Vec<MappingEntry>, start: usize, end: usize) -> Self {
        let mut hash = yaml_rust2::yaml::Hash::new();
        for entry in &entries {
            hash.insert(entry.key.yaml.clone(), entry.value.yaml.clone());
        }
        Self {
            yaml: Yaml::Hash(hash),
            start,
            end,
            children: Children::Mapping(entries),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.children {
            Children::None => NodeKind::Scalar,
            Children::Sequence(_) => NodeKind::Sequence,
            Children::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.children, Children::None)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.children, Children::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.children, Children::Mapping(_))
    }

    /// Sequence children, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[AnnotatedNode]> {
        match &self.children {
            Children::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mapping entries in source order, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.children {
            Children::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by string key.
    ///
    /// Scans entries from last to first so that, for duplicate keys, the
    /// authoritative (last) occurrence is returned.
    pub fn get(&self, key: &str) -> Option<&AnnotatedNode> {
        match &self.children {
            Children::Mapping(entries) => entries
                .iter()
                .rev()
                .find(|entry| entry.key.yaml.as_str() == Some(key))
                .map(|entry| &entry.value),
            _ => None,
        }
    }

    /// A sequence element by position.
    pub fn item(&self, index: usize) -> Option<&AnnotatedNode> {
        match &self.children {
            Children::Sequence(items) => items.get(index),
            _ => None,
        }
    }
}
