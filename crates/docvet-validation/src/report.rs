//! Rendering localized errors with source context through injected
//! sinks.
//!
//! Sinks are supplied per call so the same core serves a terminal tool
//! and an editor host that brings its own logging infrastructure; this
//! crate has no compile-time logging dependency.

use docvet_diagnostics::format_line_range;
use docvet_source_map::{MappedSource, lines};

use crate::reduce::LocalizedError;
use crate::validator::ValidatedDocument;

/// Where rendered diagnostics go.
pub trait DiagnosticSink {
    /// Receives the one-line summary, once per failed batch.
    fn error(&mut self, message: &str);
    /// Receives each fully rendered diagnostic.
    fn log(&mut self, message: &str);
}

/// Render every error in `result` with its source context and route the
/// output through `sink`. Successful results pass through untouched.
pub fn report_errors(
    result: &mut ValidatedDocument,
    source: &MappedSource,
    message: &str,
    sink: &mut dyn DiagnosticSink,
) {
    if result.errors.is_empty() {
        return;
    }
    sink.error(message);
    for error in &mut result.errors {
        error.nice_error.source_context = Some(source_context(error, source));
        sink.log(&error.nice_error.to_text());
    }
}

/// Build the underlined context block for one error.
///
/// The violating span is tightened inward past whitespace at both ends
/// (through the closest-offset mapping, since spans index the parsed
/// text while the excerpt shows the authored text), then the enclosing
/// lines — one line of padding on each side — are emitted with a tilde
/// underline beneath the offending columns.
fn source_context(error: &LocalizedError, source: &MappedSource) -> String {
    let original = source.original();
    let bytes = original.as_bytes();
    let is_whitespace = |offset: usize| {
        bytes
            .get(source.map_closest(offset))
            .is_some_and(|b| b.is_ascii_whitespace())
    };

    let mut start = error.violating_node.start;
    let end = error.violating_node.end;
    while start + 1 < end && is_whitespace(start) {
        start += 1;
    }
    // `end` is exclusive; trim from the last character inward
    let mut last = end.saturating_sub(1).max(start);
    while last > start && is_whitespace(last) {
        last -= 1;
    }

    let start_loc = source.location_at(start);
    let end_loc = source.location_at(last);
    let line_count = lines(original).len();
    let window = format_line_range(
        original,
        start_loc.row.saturating_sub(1),
        (end_loc.row + 1).min(line_count.saturating_sub(1)),
    );

    let mut out: Vec<String> = Vec::new();
    for line in &window.lines {
        out.push(line.content.clone());
        if line.line_number >= start_loc.row && line.line_number <= end_loc.row {
            let start_column = if line.line_number > start_loc.row {
                0
            } else {
                start_loc.column
            };
            let end_column = if line.line_number < end_loc.row {
                line.raw.chars().count().saturating_sub(1)
            } else {
                end_loc.column
            };
            let width = end_column.saturating_sub(start_column) + 1;
            out.push(format!(
                "{}{}",
                " ".repeat(window.prefix_width + start_column),
                "~".repeat(width)
            ));
        }
    }
    out.join("\n")
}

/// A sink that stores what it receives; useful in tests and in hosts
/// that batch their output.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub errors: Vec<String>,
    pub logs: Vec<String>,
}

impl DiagnosticSink for CollectingSink {
    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }
}
