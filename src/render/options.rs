//! Writer options and configuration.

use crate::model::ContentKind;

/// Output dialect of a [`StyledWriter`](super::StyledWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Rich Text Format with style tracking
    #[default]
    Rtf,
    /// Plain text; style calls are accepted and ignored
    Plain,
    /// Plain text intended as CSV
    Csv,
}

impl TextFormat {
    /// The content kind reported on the finished document.
    pub fn content_kind(self) -> ContentKind {
        match self {
            TextFormat::Rtf => ContentKind::Rtf,
            TextFormat::Plain => ContentKind::Text,
            TextFormat::Csv => ContentKind::Csv,
        }
    }
}

/// Flags passed to `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeginFlags {
    /// Declare the 19-entry color table in the preamble
    pub color_table: bool,
}

impl BeginFlags {
    /// Preamble with fonts only.
    pub const NONE: Self = Self { color_table: false };

    /// Preamble with fonts and the color table.
    pub const COLOR_TABLE: Self = Self { color_table: true };
}

/// Options for a styled writer.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Output dialect
    pub format: TextFormat,

    /// Fold characters to 7-bit printable ASCII in `write_char`
    pub strip_high_bits: bool,

    /// Initial point size
    pub point_size: u16,
}

impl WriterOptions {
    /// Create new writer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output dialect.
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Plain text output.
    pub fn plain(mut self) -> Self {
        self.format = TextFormat::Plain;
        self
    }

    /// Enable or disable high-bit stripping.
    pub fn with_strip_high_bits(mut self, strip: bool) -> Self {
        self.strip_high_bits = strip;
        self
    }

    /// Set the initial point size.
    pub fn with_point_size(mut self, points: u16) -> Self {
        self.point_size = points;
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            format: TextFormat::Rtf,
            strip_high_bits: false,
            point_size: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_options_builder() {
        let options = WriterOptions::new()
            .plain()
            .with_strip_high_bits(true)
            .with_point_size(12);

        assert_eq!(options.format, TextFormat::Plain);
        assert!(options.strip_high_bits);
        assert_eq!(options.point_size, 12);
    }

    #[test]
    fn test_default_options() {
        let options = WriterOptions::default();
        assert_eq!(options.format, TextFormat::Rtf);
        assert!(!options.strip_high_bits);
        assert_eq!(options.point_size, 8);
        assert_eq!(options.format.content_kind(), ContentKind::Rtf);
    }
}
