//! # docvet-yaml
//!
//! The position-annotated document tree validated by docvet.
//!
//! Every node wraps an owned `yaml_rust2::Yaml` value together with the
//! byte span it was decoded from and a parallel, source-tracked children
//! structure. Mapping children are kept as an ordered list of key/value
//! entries rather than a map: this preserves duplicate keys and source
//! order, both of which a key-unique map type would destroy and both of
//! which error localization depends on.
//!
//! Trees are produced by a host-supplied parser and treated as immutable
//! here; this crate only defines the model and constructors for building
//! it.

mod annotated;

pub use annotated::{AnnotatedNode, MappingEntry, NodeKind};
