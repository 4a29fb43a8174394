//! Instance-path navigation over the annotated document tree.

use docvet_yaml::AnnotatedNode;
use thiserror::Error;

use crate::violation::PathSegment;

/// The instance path and the document tree disagree.
///
/// This never happens when the tree and the validator operated on the
/// same instance; it indicates a programming-contract violation in the
/// caller, not a problem with the document, and is therefore surfaced
/// as a fatal error rather than a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigateError {
    #[error("key '{key}' not found in mapping")]
    KeyNotFound { key: String },

    #[error("index {index} out of bounds in sequence")]
    IndexOutOfBounds { index: usize },

    #[error("cannot descend into a {kind} node with segment '{segment}'")]
    KindMismatch { segment: String, kind: &'static str },
}

/// Resolve an instance path to the document node it denotes.
///
/// With `want_key` set, the final segment resolves to the mapping *key*
/// node instead of the value node — used when a diagnostic is about the
/// property name itself, so the highlighted span is the key.
pub fn navigate<'a>(
    path: &[PathSegment],
    node: &'a AnnotatedNode,
    want_key: bool,
) -> Result<&'a AnnotatedNode, NavigateError> {
    let Some((segment, rest)) = path.split_first() else {
        return Ok(node);
    };
    if let Some(entries) = node.as_mapping() {
        let PathSegment::Key(search_key) = segment else {
            return Err(NavigateError::KindMismatch {
                segment: segment.to_string(),
                kind: "mapping",
            });
        };
        // Scan from the last entry: when a key is repeated, validators
        // treat the last occurrence as authoritative, and the reported
        // location must agree with the reported violation.
        for entry in entries.iter().rev() {
            if entry.key.yaml.as_str() == Some(search_key.as_str()) {
                let target = if want_key && rest.is_empty() {
                    &entry.key
                } else {
                    &entry.value
                };
                return navigate(rest, target, want_key);
            }
        }
        Err(NavigateError::KeyNotFound {
            key: search_key.clone(),
        })
    } else if let Some(items) = node.as_sequence() {
        let PathSegment::Index(index) = segment else {
            return Err(NavigateError::KindMismatch {
                segment: segment.to_string(),
                kind: "sequence",
            });
        };
        match items.get(*index) {
            Some(child) => navigate(rest, child, want_key),
            None => Err(NavigateError::IndexOutOfBounds { index: *index }),
        }
    } else {
        Err(NavigateError::KindMismatch {
            segment: segment.to_string(),
            kind: "scalar",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvet_yaml::MappingEntry;
    use yaml_rust2::Yaml;

    fn scalar(yaml: Yaml, start: usize, end: usize) -> AnnotatedNode {
        AnnotatedNode::scalar(yaml, start, end)
    }

    fn key(name: &str, start: usize) -> AnnotatedNode {
        scalar(Yaml::String(name.to_string()), start, start + name.len())
    }

    fn path(segments: &[PathSegment]) -> Vec<PathSegment> {
        segments.to_vec()
    }

    #[test]
    fn empty_path_returns_the_node() {
        let node = scalar(Yaml::Integer(1), 0, 1);
        let found = navigate(&[], &node, false).unwrap();
        assert_eq!(found.start, 0);
    }

    #[test]
    fn resolves_values_and_keys() {
        let node = AnnotatedNode::mapping(
            vec![MappingEntry::new(
                key("title", 0),
                scalar(Yaml::String("hi".to_string()), 7, 9),
            )],
            0,
            9,
        );
        let p = path(&[PathSegment::Key("title".to_string())]);
        assert_eq!(navigate(&p, &node, false).unwrap().start, 7);
        assert_eq!(navigate(&p, &node, true).unwrap().start, 0);
    }

    #[test]
    fn duplicate_keys_resolve_to_the_last_occurrence() {
        let node = AnnotatedNode::mapping(
            vec![
                MappingEntry::new(key("x", 0), scalar(Yaml::Integer(1), 3, 4)),
                MappingEntry::new(key("x", 5), scalar(Yaml::Integer(2), 8, 9)),
            ],
            0,
            9,
        );
        let p = path(&[PathSegment::Key("x".to_string())]);
        assert_eq!(navigate(&p, &node, false).unwrap().start, 8);
        assert_eq!(navigate(&p, &node, true).unwrap().start, 5);
    }

    #[test]
    fn sequences_index_positionally() {
        let node = AnnotatedNode::sequence(
            vec![
                scalar(Yaml::Integer(1), 2, 3),
                scalar(Yaml::Integer(2), 6, 7),
            ],
            0,
            7,
        );
        let p = path(&[PathSegment::Index(1)]);
        assert_eq!(navigate(&p, &node, false).unwrap().start, 6);
        assert_eq!(
            navigate(&[PathSegment::Index(5)], &node, false).unwrap_err(),
            NavigateError::IndexOutOfBounds { index: 5 }
        );
    }

    #[test]
    fn mismatches_are_contract_violations() {
        let mapping = AnnotatedNode::mapping(vec![], 0, 0);
        assert!(matches!(
            navigate(&[PathSegment::Index(0)], &mapping, false),
            Err(NavigateError::KindMismatch { kind: "mapping", .. })
        ));
        assert!(matches!(
            navigate(&[PathSegment::Key("a".to_string())], &mapping, false),
            Err(NavigateError::KeyNotFound { .. })
        ));
        let leaf = scalar(Yaml::Null, 0, 0);
        assert!(matches!(
            navigate(&[PathSegment::Key("a".to_string())], &leaf, false),
            Err(NavigateError::KindMismatch { kind: "scalar", .. })
        ));
    }

    #[test]
    fn want_key_only_applies_to_the_final_segment() {
        let inner = AnnotatedNode::mapping(
            vec![MappingEntry::new(key("b", 4), scalar(Yaml::Integer(1), 7, 8))],
            4,
            8,
        );
        let outer = AnnotatedNode::mapping(vec![MappingEntry::new(key("a", 0), inner)], 0, 8);
        let p = path(&[
            PathSegment::Key("a".to_string()),
            PathSegment::Key("b".to_string()),
        ]);
        // the intermediate segment still descends through the value;
        // only the leaf resolves to a key node
        let found = navigate(&p, &outer, true).unwrap();
        assert_eq!(found.yaml, Yaml::String("b".to_string()));
    }
}
