//! Source position tracking for docvet.
//!
//! Diagnostics produced by the validation pipeline are pinned to byte
//! spans of the text the document was parsed from. This crate provides
//! the position vocabulary ([`Location`], [`Range`]), offset/row/column
//! conversions, and [`MappedSource`], the source-text abstraction handed
//! to the validator: the text the parser saw, the text the author wrote,
//! and a mapping between the two when they differ.

mod mapped;
mod types;
mod utils;

pub use mapped::MappedSource;
pub use types::{Location, Range};
pub use utils::{lines, location_at, offset_to_location};
