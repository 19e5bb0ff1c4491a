//! Styled text output.

use serde::Serialize;
use std::borrow::Cow;

/// What dialect the bytes of a [`StyledDocument`] are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain text with CRLF line endings
    #[default]
    Text,
    /// Rich Text Format
    Rtf,
    /// Comma-separated values
    Csv,
}

impl ContentKind {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ContentKind::Text => "txt",
            ContentKind::Rtf => "rtf",
            ContentKind::Csv => "csv",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::Text => "text/plain",
            ContentKind::Rtf => "application/rtf",
            ContentKind::Csv => "text/csv",
        }
    }
}

/// A finished text artifact: the emitted bytes plus their dialect.
///
/// Bytes rather than a `String` because RTF output declares Windows-1252
/// and may carry raw high-bit characters.
#[derive(Debug, Clone, Serialize)]
pub struct StyledDocument {
    /// Emitted bytes
    #[serde(skip_serializing)]
    content: Vec<u8>,

    /// Dialect of the content
    pub kind: ContentKind,

    /// Whether the document changes fonts, so a viewer should not force one
    pub multi_font: bool,
}

impl StyledDocument {
    /// Create a document from finished content.
    pub fn new(content: Vec<u8>, kind: ContentKind) -> Self {
        Self {
            content,
            kind,
            multi_font: false,
        }
    }

    /// Mark the document as using more than one font.
    pub fn with_multi_font(mut self, multi_font: bool) -> Self {
        self.multi_font = multi_font;
        self
    }

    /// The emitted bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Consume the document, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }

    /// The content as text, replacing any invalid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
