//! Core diagnostic message types.

use docvet_source_map::Range;
use serde::{Deserialize, Serialize};

/// The severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

/// How a detail item is presented (x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Plain note (• bullet)
    Note,
}

/// A single bulleted detail of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
}

/// A structured diagnostic message.
///
/// The `title` is the one-line heading ("The value ... must ...").
/// Details carry the where/why as short bullets. `source_context` is the
/// rendered excerpt-with-underline block, filled in by the diagnostic
/// formatter once the enclosing lines have been extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub title: String,
    pub details: Vec<DetailItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            details: Vec::new(),
            location: None,
            source_context: None,
            file_name: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn with_location(mut self, location: Range) -> Self {
        self.location = Some(location);
        self
    }

    /// Append an error-kind detail bullet.
    pub fn add_detail(&mut self, content: impl Into<String>) {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: content.into(),
        });
    }

    /// Append an info-kind detail bullet.
    pub fn add_info(&mut self, content: impl Into<String>) {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: content.into(),
        });
    }

    /// Append a plain note bullet.
    pub fn add_note(&mut self, content: impl Into<String>) {
        self.details.push(DetailItem {
            kind: DetailKind::Note,
            content: content.into(),
        });
    }

    /// Render as plain text.
    ///
    /// ```text
    /// Error: the heading
    /// <source context block>
    /// ✖ error detail
    /// ℹ info detail
    /// • note
    /// ```
    pub fn to_text(&self) -> String {
        use std::fmt::Write;

        let kind = match self.kind {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
        };
        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", kind, self.title);
        if let Some(context) = &self.source_context {
            let _ = writeln!(out, "{}", context);
        }
        for detail in &self.details {
            let bullet = match detail.kind {
                DetailKind::Error => "✖",
                DetailKind::Info => "ℹ",
                DetailKind::Note => "•",
            };
            let _ = writeln!(out, "{} {}", bullet, detail.content);
        }
        out
    }
}
