//! Structured diagnostic messages for docvet.
//!
//! A [`DiagnosticMessage`] is the host-independent record a validation
//! failure is rendered from: a heading, bulleted details, an optional
//! source location and an optional pre-rendered source-context block.
//! Hosts decide presentation; this crate only provides the structure, a
//! plain-text rendering, and the helpers used to attach file and
//! document-path breadcrumbs.

mod context;
mod diagnostic;
mod info;

pub use context::{LineRange, NumberedLine, format_line_range};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
pub use info::{add_file_info, add_instance_path_info, location_string};
