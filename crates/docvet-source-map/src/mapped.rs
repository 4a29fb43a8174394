//! The source-text abstraction consumed by the validation pipeline.

use crate::types::Location;
use crate::utils::location_at;

/// Source text paired with the original authored text it came from.
///
/// The text handed to a parser is not always the text the author wrote:
/// hosts strip boilerplate, splice fragments, or normalize line endings
/// before parsing. Diagnostics must nevertheless point at the authored
/// text. `MappedSource` carries both texts and a per-offset "closest
/// original offset" mapping so that spans computed against the parsed
/// text can be reported against the original.
///
/// In the common case the two texts are identical and the mapping is the
/// identity; use [`MappedSource::new`] for that.
#[derive(Debug, Clone)]
pub struct MappedSource {
    value: String,
    file_name: Option<String>,
    mapping: Option<Mapping>,
}

#[derive(Debug, Clone)]
struct Mapping {
    original: String,
    /// closest[i] is the original-text offset nearest to parsed-text
    /// offset i; length is value.len() + 1 so the end offset maps too.
    closest: Vec<usize>,
}

impl MappedSource {
    /// A source whose parsed text is the authored text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            value: text.into(),
            file_name: None,
            mapping: None,
        }
    }

    /// A source whose parsed text differs from the authored text.
    ///
    /// `closest` must hold one original-text offset per parsed-text byte
    /// offset, including the end offset (`value.len() + 1` entries).
    pub fn with_mapping(
        value: impl Into<String>,
        original: impl Into<String>,
        closest: Vec<usize>,
    ) -> Self {
        let value = value.into();
        debug_assert_eq!(closest.len(), value.len() + 1);
        Self {
            value,
            file_name: None,
            mapping: Some(Mapping {
                original: original.into(),
                closest,
            }),
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// The text the parser consumed; node spans index into this.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The authored text; reported positions and context lines index
    /// into this.
    pub fn original(&self) -> &str {
        match &self.mapping {
            Some(mapping) => &mapping.original,
            None => &self.value,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Map a parsed-text offset to the closest authored-text offset.
    pub fn map_closest(&self, offset: usize) -> usize {
        match &self.mapping {
            Some(mapping) => {
                let at = offset.min(mapping.closest.len().saturating_sub(1));
                mapping.closest.get(at).copied().unwrap_or(0)
            }
            None => offset.min(self.value.len()),
        }
    }

    /// Row/column position, in the authored text, of a parsed-text offset.
    pub fn location_at(&self, offset: usize) -> Location {
        location_at(self.original(), self.map_closest(offset))
    }

    /// The raw parsed-text excerpt for a span, clamped to the text.
    pub fn excerpt(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.value.len());
        let start = start.min(end);
        if self.value.is_char_boundary(start) && self.value.is_char_boundary(end) {
            &self.value[start..end]
        } else {
            ""
        }
    }
}
