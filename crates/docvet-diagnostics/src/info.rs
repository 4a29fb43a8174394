//! Breadcrumb helpers attached to diagnostics by the validation pipeline.

use crate::diagnostic::DiagnosticMessage;
use docvet_source_map::Range;

/// Human-oriented, 1-indexed rendering of a range.
pub fn location_string(range: &Range) -> String {
    if range.start.row == range.end.row {
        format!(
            "line {}, columns {}-{}",
            range.start.row + 1,
            range.start.column + 1,
            range.end.column + 1
        )
    } else {
        format!(
            "lines {}-{}",
            range.start.row + 1,
            range.end.row + 1
        )
    }
}

/// Record which file the diagnostic points into.
///
/// Adds an info bullet with the file name and, when the diagnostic
/// already carries a location, the position within it.
pub fn add_file_info(message: &mut DiagnosticMessage, file_name: Option<&str>) {
    let Some(name) = file_name else {
        return;
    };
    let note = match &message.location {
        Some(location) => format!("In file {} ({})", name, location_string(location)),
        None => format!("In file {}", name),
    };
    message.file_name = Some(name.to_string());
    message.add_info(note);
}

/// Record the document path the diagnostic refers to.
///
/// The root path is omitted; "somewhere in the document" is not a useful
/// breadcrumb.
pub fn add_instance_path_info(message: &mut DiagnosticMessage, instance_path: &str) {
    if instance_path.is_empty() {
        return;
    }
    message.add_info(format!("At document path {}", instance_path));
}
