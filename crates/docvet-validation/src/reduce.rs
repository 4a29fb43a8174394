//! Error reduction: grouping, pruning and narrowing raw violations into
//! a minimal localized set.
//!
//! Engines run in report-everything mode so that editor hosts can
//! squiggle the whole file; for human-readable reporting that output is
//! far too noisy. Two heuristics do most of the distillation:
//!
//! 1. Across instance paths, keep only the innermost failures — a
//!    failure against an ancestor is redundant once a failure inside it
//!    is also reported, and a smaller instance is easier to fix.
//! 2. Within one instance path, prefer the most general schema rule
//!    that failed over every nested detail of why it failed.
//!
//! On top of that, two keyword-specific narrowing rules rewrite
//! low-information violations into precise ones (`additionalProperties`
//! becomes a keyed unknown-property diagnostic; `oneOf` collapses to
//! the one branch that failed only on unexpected properties). Narrowing
//! feeds new violations back into the working set, so the whole
//! transform runs to a fixed point.

use docvet_diagnostics::{DiagnosticMessage, add_file_info, add_instance_path_info};
use docvet_source_map::{MappedSource, Range};
use docvet_yaml::AnnotatedNode;

use crate::error::Result;
use crate::navigate::navigate;
use crate::schema::{Schema, SchemaRegistry, navigate_schema};
use crate::violation::{InstancePath, Keyword, RawViolation, SchemaPath, ViolationParams};

/// A violation enriched with the document node it points at, source
/// coordinates, and a display-ready diagnostic.
#[derive(Debug, Clone)]
pub struct LocalizedError {
    pub instance_path: InstancePath,
    /// The engine's raw message.
    pub message: String,
    /// The node the diagnostic is pinned to; always a node of the tree
    /// passed to the same validation call.
    pub violating_node: AnnotatedNode,
    pub location: Range,
    pub nice_error: DiagnosticMessage,
    /// The violation this error was built from, for downstream
    /// fine-tuning by handlers.
    pub violation: RawViolation,
}

impl LocalizedError {
    /// The raw source excerpt of the violating span.
    pub fn verbatim_input<'a>(&self, source: &'a MappedSource) -> &'a str {
        source.excerpt(self.violating_node.start, self.violating_node.end)
    }
}

/// A violation in the working set, tagged with whether a narrowing rule
/// has consumed it. Synthesized successors are born processed and can
/// therefore never regenerate, which bounds the fixed-point loop.
#[derive(Debug, Clone)]
struct Tracked {
    violation: RawViolation,
    processed: bool,
}

/// Order-preserving grouping; groups appear in first-occurrence order.
fn group_by<T, K, F>(items: Vec<T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        if let Some((_, members)) = groups.iter_mut().find(|(existing, _)| *existing == k) {
            members.push(item);
        } else {
            groups.push((k, vec![item]));
        }
    }
    groups
}

/// Reduce raw violations to localized errors, ordered by ascending
/// start offset of the violating node.
pub fn localize_and_prune(
    root: &AnnotatedNode,
    violations: Vec<RawViolation>,
    source: &MappedSource,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<Vec<LocalizedError>> {
    let tracked: Vec<Tracked> = violations
        .into_iter()
        .map(|violation| Tracked {
            violation,
            processed: false,
        })
        .collect();
    let mut groups = group_by(tracked, |t| t.violation.instance_path.clone());

    loop {
        prune_ancestor_groups(&mut groups);

        let mut fed_back: Vec<Tracked> = Vec::new();
        for (path, members) in &mut groups {
            fed_back.extend(transform_group(path, members));
        }
        if fed_back.is_empty() {
            break;
        }
        // fed-back violations join as fresh groups and may themselves be
        // pruned or transformed on the next pass
        groups.extend(group_by(fed_back, |t| t.violation.instance_path.clone()));
    }

    let mut result = Vec::new();
    for (path, members) in &groups {
        // transformations may have changed which schema paths are
        // present, so the generality filter applies once more
        let general = most_general_schema_paths(members);
        for tracked in members {
            if general.contains(&tracked.violation.schema_path) {
                result.push(build_localized(
                    root,
                    path,
                    &tracked.violation,
                    source,
                    schema,
                    registry,
                )?);
            }
        }
    }
    result.sort_by_key(|error| error.violating_node.start);
    Ok(result)
}

/// Keep only the most specific instance locations.
fn prune_ancestor_groups(groups: &mut Vec<(InstancePath, Vec<Tracked>)>) {
    let paths: Vec<InstancePath> = groups.iter().map(|(path, _)| path.clone()).collect();
    groups.retain(|(path, _)| !paths.iter().any(|other| path.is_proper_prefix_of(other)));
}

/// The schema paths in a group that are not proper extensions of another
/// present schema path — the most general rules that failed there.
fn most_general_schema_paths(members: &[Tracked]) -> Vec<SchemaPath> {
    members
        .iter()
        .map(|t| &t.violation.schema_path)
        .filter(|candidate| {
            !members
                .iter()
                .any(|other| other.violation.schema_path.is_proper_prefix_of(candidate))
        })
        .cloned()
        .collect()
}

/// Apply keyword-specific narrowing once per eligible violation.
///
/// Consumed violations are removed from the group; their successors are
/// returned for feeding back into the working set.
fn transform_group(path: &InstancePath, members: &mut Vec<Tracked>) -> Vec<Tracked> {
    let general = most_general_schema_paths(members);
    let mut fed_back: Vec<Tracked> = Vec::new();
    let mut consumed: Vec<usize> = Vec::new();
    let mut consumed_subtrees: Vec<SchemaPath> = Vec::new();

    for (index, tracked) in members.iter().enumerate() {
        if tracked.processed || !general.contains(&tracked.violation.schema_path) {
            continue;
        }
        match &tracked.violation.keyword {
            Keyword::OneOf => {
                fed_back.extend(narrow_one_of(&tracked.violation, members).into_iter().map(
                    |violation| Tracked {
                        violation,
                        processed: false,
                    },
                ));
                // The oneOf and every per-branch sub-violation under it
                // are consumed whether or not a branch narrowed; with no
                // clean branch the violation is discarded outright (see
                // DESIGN.md on this deliberate information loss).
                consumed_subtrees.push(tracked.violation.schema_path.clone());
            }
            Keyword::AdditionalProperties => {
                if let ViolationParams::AdditionalProperty { property } = &tracked.violation.params
                {
                    fed_back.push(Tracked {
                        violation: synthesize_invalid_property(path, &tracked.violation, property),
                        processed: true,
                    });
                    consumed.push(index);
                }
            }
            _ => {}
        }
    }

    if !consumed.is_empty() || !consumed_subtrees.is_empty() {
        let mut index = 0;
        members.retain(|tracked| {
            let drop_directly = consumed.contains(&index);
            index += 1;
            if drop_directly {
                return false;
            }
            !consumed_subtrees.iter().any(|subtree| {
                tracked.violation.schema_path == *subtree
                    || subtree.is_proper_prefix_of(&tracked.violation.schema_path)
            })
        });
    }
    fed_back
}

/// Narrow a `oneOf` violation to the failures of a branch that failed
/// only because of unexpected properties — "matches none of N variants"
/// becomes "this variant failed only on these properties". Returns
/// nothing when no branch qualifies.
fn narrow_one_of(one_of: &RawViolation, members: &[Tracked]) -> Vec<RawViolation> {
    let descendants: Vec<&RawViolation> = members
        .iter()
        .map(|t| &t.violation)
        .filter(|v| one_of.schema_path.is_proper_prefix_of(&v.schema_path))
        .collect();
    let per_branch = group_by(descendants, |v| v.schema_path.parent());
    per_branch
        .into_iter()
        .find(|(_, branch)| {
            branch
                .iter()
                .all(|v| v.keyword == Keyword::AdditionalProperties)
        })
        .map(|(_, branch)| branch.into_iter().cloned().collect())
        .unwrap_or_default()
}

/// The `additionalProperties` successor: a keyed unknown-property
/// diagnostic at the offending property. The schema path drops its
/// trailing `additionalProperties` segment so that navigation resolves
/// to the parent object schema, not the keyword.
fn synthesize_invalid_property(
    path: &InstancePath,
    violation: &RawViolation,
    property: &str,
) -> RawViolation {
    RawViolation {
        keyword: Keyword::InvalidProperty,
        instance_path: path.child_key(property),
        schema_path: violation.schema_path.parent(),
        message: format!("property {} not allowed in object", property),
        params: ViolationParams::AdditionalProperty {
            property: property.to_string(),
        },
        schema: violation.schema.clone(),
        parent_schema: violation.parent_schema.clone(),
    }
}

fn build_localized(
    root: &AnnotatedNode,
    path: &InstancePath,
    violation: &RawViolation,
    source: &MappedSource,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<LocalizedError> {
    // unknown-property diagnostics highlight the key, not its value
    let want_key = violation.keyword.is_synthesized();
    let node = navigate(path.segments(), root, want_key)?;
    let location = Range::new(source.location_at(node.start), source.location_at(node.end));

    let heading = compose_heading(violation, path, node, source, schema, registry);
    let mut nice_error = DiagnosticMessage::error(heading).with_location(location.clone());
    add_file_info(&mut nice_error, source.file_name());
    add_instance_path_info(&mut nice_error, &path.to_string());

    Ok(LocalizedError {
        instance_path: path.clone(),
        message: violation.message.clone(),
        violating_node: node.clone(),
        location,
        nice_error,
        violation: violation.clone(),
    })
}

fn compose_heading(
    violation: &RawViolation,
    path: &InstancePath,
    node: &AnnotatedNode,
    source: &MappedSource,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> String {
    // synthesized violations carry a message prepared by the narrowing rule
    if violation.keyword.is_synthesized() {
        return violation.message.clone();
    }
    if path.is_empty() {
        return format!("(top-level error) {}", violation.message);
    }
    let resolved: Vec<&Schema> = match violation.schema.as_ref() {
        Some(attached) => vec![attached],
        None => navigate_schema(violation.schema_path.segments(), schema, registry),
    };
    let descriptions: Vec<&str> = resolved
        .iter()
        .filter_map(|s| s.description.as_deref())
        .collect();
    if descriptions.is_empty() {
        // no responsible subschema, or none that can describe itself:
        // best-effort message from an unrecognized schema construct
        return format!("Schema {}: {}", violation.schema_path, violation.message);
    }
    let id_tag = resolved
        .iter()
        .find_map(|s| s.id.as_deref())
        .map(|id| format!(" (schema id: {})", id))
        .unwrap_or_default();
    format!(
        "The value \"{}\" must {}{}.",
        source.excerpt(node.start, node.end),
        descriptions.join(", "),
        id_tag
    )
}
