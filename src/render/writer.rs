//! Incremental styled-text writer.

use super::options::{BeginFlags, TextFormat, WriterOptions};
use super::style::{GsFontFamily, Justification, QdStyle, RtfFont, StyleState, TextColor};
use crate::charset::{map_extended, to_printable};
use crate::error::{Error, Result};
use crate::model::StyledDocument;
use std::io::Write;

const RTF_HEADER: &str = concat!(
    "{\\rtf1\\ansi\\ansicpg1252\\deff0\\deflang1033",
    "{\\fonttbl",
    "{\\f0\\fmodern\\fprq1\\fcharset0 Courier New;}",
    "{\\f1\\froman\\fprq2\\fcharset0 Times New Roman;}",
    "{\\f2\\fswiss\\fprq2\\fcharset0 Arial;}",
    "{\\f3\\froman\\fprq2\\fcharset2 Symbol;}",
    "}\r\n",
);

// Order must match `TextColor`.
const RTF_COLOR_TABLE: &str = concat!(
    "{\\colortbl;",
    "\\red0\\green0\\blue0;",
    "\\red0\\green0\\blue255;",
    "\\red0\\green255\\blue255;",
    "\\red0\\green255\\blue0;",
    "\\red255\\green0\\blue255;",
    "\\red255\\green0\\blue0;",
    "\\red255\\green255\\blue0;",
    "\\red255\\green255\\blue255;",
    "\\red0\\green0\\blue128;",
    "\\red0\\green128\\blue128;",
    "\\red0\\green128\\blue0;",
    "\\red128\\green0\\blue128;",
    "\\red128\\green0\\blue0;",
    "\\red128\\green128\\blue0;",
    "\\red128\\green128\\blue128;",
    "\\red192\\green192\\blue192;",
    "\\red64\\green64\\blue64;",
    "\\red255\\green153\\blue0;",
    "}\r\n",
);

const RTF_UNITS_PER_INCH: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Open,
    Closed,
}

/// Builds a text document while tracking the live style.
///
/// Style calls compare against the tracked [`StyleState`] and emit a control
/// word only when the attribute actually changes. Every write or style call
/// must come between one `begin` and one `end`; anything else is a
/// [`Error::Sequence`]. The result is only available from
/// [`finish`](Self::finish) once `end` has run.
///
/// In plain text and CSV modes the style calls still update the tracked
/// state but emit nothing.
///
/// # Example
///
/// ```
/// use reformat::render::{BeginFlags, StyledWriter, WriterOptions};
///
/// let mut writer = StyledWriter::new(WriterOptions::default());
/// writer.begin(BeginFlags::NONE)?;
/// writer.set_bold(true)?;
/// writer.write_text(b"{hello}")?;
/// writer.set_bold(false)?;
/// writer.end()?;
///
/// let doc = writer.finish()?;
/// assert!(doc.to_string_lossy().contains("\\b \\{hello\\}\\b0 "));
/// # Ok::<(), reformat::Error>(())
/// ```
#[derive(Debug)]
pub struct StyledWriter {
    buf: Vec<u8>,
    options: WriterOptions,
    style: StyleState,
    phase: Phase,
    gs_size_mult: f32,
    gs_point_size: Option<u16>,
    font_changed: bool,
}

impl StyledWriter {
    /// Create a writer.
    pub fn new(options: WriterOptions) -> Self {
        let style = StyleState::new(options.point_size);
        Self {
            buf: Vec::new(),
            options,
            style,
            phase: Phase::Ready,
            gs_size_mult: 1.0,
            gs_point_size: None,
            font_changed: false,
        }
    }

    /// Create an RTF writer with default options.
    pub fn rtf() -> Self {
        Self::new(WriterOptions::default())
    }

    /// Create a plain text writer.
    pub fn plain(strip_high_bits: bool) -> Self {
        Self::new(
            WriterOptions::new()
                .plain()
                .with_strip_high_bits(strip_high_bits),
        )
    }

    /// Check if output is RTF.
    pub fn is_rtf(&self) -> bool {
        self.options.format == TextFormat::Rtf
    }

    /// The tracked style.
    pub fn style(&self) -> &StyleState {
        &self.style
    }

    /// Bytes emitted so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    // ---- lifecycle ----

    /// Open the document, writing the preamble.
    pub fn begin(&mut self, flags: BeginFlags) -> Result<()> {
        match self.phase {
            Phase::Ready => {}
            Phase::Open => return Err(Error::Sequence("begin called twice")),
            Phase::Closed => return Err(Error::Sequence("begin called after end")),
        }
        self.phase = Phase::Open;

        if self.is_rtf() {
            self.put(RTF_HEADER);
            if flags.color_table {
                self.put(RTF_COLOR_TABLE);
            }
            let size = self.style.point_size;
            self.printf(format_args!("\\viewkind4\\uc1\\pard\\f0\\fs{} ", u32::from(size) * 2));
        }
        Ok(())
    }

    /// Close the document.
    pub fn end(&mut self) -> Result<()> {
        self.require_open()?;
        self.phase = Phase::Closed;
        if self.is_rtf() {
            self.put("}\r\n");
        }
        Ok(())
    }

    /// Take the finished document.
    pub fn finish(self) -> Result<StyledDocument> {
        if self.phase != Phase::Closed {
            return Err(Error::Sequence("document read before end"));
        }
        Ok(
            StyledDocument::new(self.buf, self.options.format.content_kind())
                .with_multi_font(self.font_changed),
        )
    }

    // ---- character styles ----

    /// Turn bold on or off.
    pub fn set_bold(&mut self, on: bool) -> Result<()> {
        self.require_open()?;
        if self.style.bold != on {
            self.style.bold = on;
            self.emit(if on { "\\b " } else { "\\b0 " });
        }
        Ok(())
    }

    /// Turn italic on or off.
    pub fn set_italic(&mut self, on: bool) -> Result<()> {
        self.require_open()?;
        if self.style.italic != on {
            self.style.italic = on;
            self.emit(if on { "\\i " } else { "\\i0 " });
        }
        Ok(())
    }

    /// Turn underline on or off.
    pub fn set_underline(&mut self, on: bool) -> Result<()> {
        self.require_open()?;
        if self.style.underline != on {
            self.style.underline = on;
            self.emit(if on { "\\ul " } else { "\\ulnone " });
        }
        Ok(())
    }

    /// Turn superscript on or off. Turning it on ends any subscript first.
    pub fn set_superscript(&mut self, on: bool) -> Result<()> {
        self.require_open()?;
        if self.style.superscript == on {
            return Ok(());
        }
        if on {
            self.set_subscript(false)?;
            self.emit("\\super ");
        } else {
            self.emit("\\nosupersub ");
        }
        self.style.superscript = on;
        Ok(())
    }

    /// Turn subscript on or off. Turning it on ends any superscript first.
    pub fn set_subscript(&mut self, on: bool) -> Result<()> {
        self.require_open()?;
        if self.style.subscript == on {
            return Ok(());
        }
        if on {
            self.set_superscript(false)?;
            self.emit("\\sub ");
        } else {
            self.emit("\\nosupersub ");
        }
        self.style.subscript = on;
        Ok(())
    }

    /// Select a declared font.
    pub fn set_font(&mut self, font: RtfFont) -> Result<()> {
        self.require_open()?;
        if self.style.font != font {
            self.style.font = font;
            self.font_changed = true;
            self.emit_fmt(format_args!("\\f{} ", font as u8));
        }
        Ok(())
    }

    /// Set the point size.
    pub fn set_font_size(&mut self, points: u16) -> Result<()> {
        self.require_open()?;
        if self.style.point_size != points {
            self.style.point_size = points;
            self.emit_fmt(format_args!("\\fs{} ", u32::from(points) * 2));
        }
        Ok(())
    }

    /// Select a color from the color table.
    ///
    /// The color table must have been declared at `begin` for the color to
    /// show.
    pub fn set_color(&mut self, color: TextColor) -> Result<()> {
        self.require_open()?;
        if self.style.color != color {
            self.style.color = color;
            self.emit_fmt(format_args!("\\cf{} ", color as u8));
        }
        Ok(())
    }

    /// Select the closest font for an Apple IIgs font family.
    ///
    /// Reapplies the last IIgs point size, since the size multiplier
    /// depends on the family.
    pub fn set_gs_font(&mut self, family: GsFontFamily) -> Result<()> {
        self.require_open()?;
        let (font, mult) = family.rtf_font();
        self.set_font(font)?;
        self.gs_size_mult = mult;
        if let Some(points) = self.gs_point_size {
            self.set_gs_font_size(points)?;
        }
        Ok(())
    }

    /// Set a point size given in Apple IIgs points.
    pub fn set_gs_font_size(&mut self, points: u16) -> Result<()> {
        self.require_open()?;
        self.gs_point_size = Some(points);
        let scaled = (f32::from(points) * self.gs_size_mult).round() as u16;
        self.set_font_size(scaled.max(1))
    }

    /// Apply a QuickDraw II style byte.
    pub fn set_gs_font_style(&mut self, style: QdStyle) -> Result<()> {
        self.set_bold(style.has(QdStyle::BOLD))?;
        self.set_italic(style.has(QdStyle::ITALIC))?;
        self.set_underline(style.has(QdStyle::UNDERLINE))?;
        if style.has(QdStyle::SUPERSCRIPT) {
            self.set_superscript(true)
        } else if style.has(QdStyle::SUBSCRIPT) {
            self.set_subscript(true)
        } else {
            self.set_superscript(false)?;
            self.set_subscript(false)
        }
    }

    // ---- paragraph styles ----

    /// Set paragraph alignment. Takes effect through a paragraph reset.
    pub fn set_justification(&mut self, justification: Justification) -> Result<()> {
        self.require_open()?;
        if self.style.justification != justification {
            self.style.justification = justification;
            self.set_para()?;
        }
        Ok(())
    }

    /// Set both margins, in tenths of an inch.
    pub fn set_margins(&mut self, left: u16, right: u16) -> Result<()> {
        self.require_open()?;
        if self.style.left_margin != left || self.style.right_margin != right {
            self.style.left_margin = left;
            self.style.right_margin = right;
            self.set_para()?;
        }
        Ok(())
    }

    /// Set the left margin, in tenths of an inch.
    pub fn set_left_margin(&mut self, margin: u16) -> Result<()> {
        let right = self.style.right_margin;
        self.set_margins(margin, right)
    }

    /// Set the right margin, in tenths of an inch.
    pub fn set_right_margin(&mut self, margin: u16) -> Result<()> {
        let left = self.style.left_margin;
        self.set_margins(left, margin)
    }

    /// Reset paragraph properties and re-declare margins and alignment.
    pub fn set_para(&mut self) -> Result<()> {
        self.require_open()?;
        if !self.is_rtf() {
            return Ok(());
        }
        self.put("\\pard\\nowidctlpar");
        if self.style.left_margin != 0 {
            let twips = tenths_to_twips(self.style.left_margin);
            self.printf(format_args!("\\li{}", twips));
        }
        if self.style.right_margin != 0 {
            let twips = tenths_to_twips(self.style.right_margin);
            self.printf(format_args!("\\ri{}", twips));
        }
        self.put(self.style.justification.control_word());
        self.put(" ");
        Ok(())
    }

    // ---- structure ----

    /// End the current paragraph.
    pub fn new_paragraph(&mut self) -> Result<()> {
        self.require_open()?;
        if self.is_rtf() {
            self.put("\\par\r\n");
        } else {
            self.put("\r\n");
        }
        Ok(())
    }

    /// Insert a page break.
    pub fn page_break(&mut self) -> Result<()> {
        self.require_open()?;
        if self.is_rtf() {
            self.put("\\page ");
        } else {
            self.put("\r\n\x0c");
        }
        Ok(())
    }

    /// Insert a tab stop.
    pub fn tab(&mut self) -> Result<()> {
        self.require_open()?;
        if self.is_rtf() {
            self.put("\\tab ");
        } else {
            self.put("\t");
        }
        Ok(())
    }

    // ---- text ----

    /// Write one source character.
    ///
    /// A tab becomes a tab stop. Otherwise the byte is folded with
    /// [`to_printable`] when the writer strips high bits, or passed through
    /// unchanged, and in RTF the reserved characters `\`, `{` and `}` are
    /// escaped.
    pub fn write_char(&mut self, byte: u8) -> Result<()> {
        self.require_open()?;
        if byte == b'\t' {
            return self.tab();
        }
        let byte = if self.options.strip_high_bits {
            to_printable(byte)
        } else {
            byte
        };
        self.put_escaped(byte);
        Ok(())
    }

    /// Write an Apple IIgs character, translating it to Windows-1252.
    pub fn write_gs_char(&mut self, byte: u8) -> Result<()> {
        self.require_open()?;
        if byte == b'\t' {
            return self.tab();
        }
        self.put_escaped(map_extended(byte));
        Ok(())
    }

    /// Write every byte of `text` through [`write_char`](Self::write_char).
    pub fn write_text(&mut self, text: &[u8]) -> Result<()> {
        text.iter().try_for_each(|&byte| self.write_char(byte))
    }

    /// Write a character for a CSV field, doubling double quotes.
    pub fn write_quoted_char(&mut self, byte: u8) -> Result<()> {
        self.require_open()?;
        if byte == b'"' {
            self.put("\"\"");
        } else {
            self.buf.push(byte);
        }
        Ok(())
    }

    /// Insert already-sanitized text without escaping.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.require_open()?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    // ---- internals ----

    fn require_open(&self) -> Result<()> {
        match self.phase {
            Phase::Open => Ok(()),
            Phase::Ready => Err(Error::Sequence("write before begin")),
            Phase::Closed => Err(Error::Sequence("write after end")),
        }
    }

    fn put_escaped(&mut self, byte: u8) {
        if self.is_rtf() && matches!(byte, b'\\' | b'{' | b'}') {
            self.buf.push(b'\\');
        }
        self.buf.push(byte);
    }

    fn put(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    fn printf(&mut self, args: std::fmt::Arguments<'_>) {
        // Writing into a Vec cannot fail.
        let _ = self.buf.write_fmt(args);
    }

    /// Emit a style control word; RTF only.
    fn emit(&mut self, word: &str) {
        if self.is_rtf() {
            self.put(word);
        }
    }

    fn emit_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        if self.is_rtf() {
            self.printf(args);
        }
    }
}

fn tenths_to_twips(tenths: u16) -> u32 {
    u32::from(tenths) * RTF_UNITS_PER_INCH / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_RTF: &str = concat!(
        "{\\rtf1\\ansi\\ansicpg1252\\deff0\\deflang1033",
        "{\\fonttbl",
        "{\\f0\\fmodern\\fprq1\\fcharset0 Courier New;}",
        "{\\f1\\froman\\fprq2\\fcharset0 Times New Roman;}",
        "{\\f2\\fswiss\\fprq2\\fcharset0 Arial;}",
        "{\\f3\\froman\\fprq2\\fcharset2 Symbol;}",
        "}\r\n",
        "\\viewkind4\\uc1\\pard\\f0\\fs16 ",
        "}\r\n",
    );

    fn open_rtf() -> StyledWriter {
        let mut writer = StyledWriter::rtf();
        writer.begin(BeginFlags::NONE).unwrap();
        writer
    }

    fn body(writer: StyledWriter) -> String {
        let mut writer = writer;
        writer.end().unwrap();
        let text = writer.finish().unwrap().to_string_lossy().into_owned();
        let start = text.find("\\fs16 ").unwrap() + "\\fs16 ".len();
        text[start..text.len() - 3].to_string()
    }

    #[test]
    fn test_empty_document() {
        let mut writer = StyledWriter::rtf();
        writer.begin(BeginFlags::NONE).unwrap();
        writer.end().unwrap();
        let doc = writer.finish().unwrap();
        assert_eq!(doc.as_bytes(), EMPTY_RTF.as_bytes());
        assert_eq!(doc.kind, crate::model::ContentKind::Rtf);
        assert!(!doc.multi_font);
    }

    #[test]
    fn test_color_table_declared() {
        let mut writer = StyledWriter::rtf();
        writer.begin(BeginFlags::COLOR_TABLE).unwrap();
        writer.end().unwrap();
        let text = writer.finish().unwrap().to_string_lossy().into_owned();
        let table = &text[text.find("{\\colortbl").unwrap()..];
        let table = &table[..table.find('}').unwrap()];
        assert_eq!(table.matches(';').count(), 19);
    }

    #[test]
    fn test_redundant_bold_emits_once() {
        let mut writer = open_rtf();
        writer.set_bold(true).unwrap();
        writer.set_bold(true).unwrap();
        writer.set_bold(false).unwrap();
        writer.set_bold(false).unwrap();
        assert_eq!(body(writer), "\\b \\b0 ");
    }

    #[test]
    fn test_italic_and_underline() {
        let mut writer = open_rtf();
        writer.set_italic(true).unwrap();
        writer.set_underline(true).unwrap();
        writer.set_underline(false).unwrap();
        writer.set_italic(false).unwrap();
        assert_eq!(body(writer), "\\i \\ul \\ulnone \\i0 ");
    }

    #[test]
    fn test_super_and_subscript_exclusive() {
        let mut writer = open_rtf();
        writer.set_superscript(true).unwrap();
        writer.set_subscript(true).unwrap();
        assert!(writer.style().subscript);
        assert!(!writer.style().superscript);
        writer.set_superscript(true).unwrap();
        assert!(writer.style().superscript);
        assert!(!writer.style().subscript);
        assert_eq!(
            body(writer),
            "\\super \\nosupersub \\sub \\nosupersub \\super "
        );
    }

    #[test]
    fn test_font_size_and_color() {
        let mut writer = open_rtf();
        writer.set_font_size(8).unwrap();
        writer.set_font_size(12).unwrap();
        writer.set_font(RtfFont::CourierNew).unwrap();
        writer.set_font(RtfFont::Arial).unwrap();
        writer.set_color(TextColor::Red).unwrap();
        writer.set_color(TextColor::Red).unwrap();
        assert!(writer.font_changed);
        assert_eq!(body(writer), "\\fs24 \\f2 \\cf6 ");
    }

    #[test]
    fn test_justification_and_margins() {
        let mut writer = open_rtf();
        writer.set_justification(Justification::Left).unwrap();
        writer.set_justification(Justification::Center).unwrap();
        writer.set_margins(10, 5).unwrap();
        writer.set_margins(10, 5).unwrap();
        assert_eq!(
            body(writer),
            "\\pard\\nowidctlpar\\qc \\pard\\nowidctlpar\\li1440\\ri720\\qc "
        );
    }

    #[test]
    fn test_structure_markers() {
        let mut writer = open_rtf();
        writer.write_char(b'a').unwrap();
        writer.new_paragraph().unwrap();
        writer.tab().unwrap();
        writer.page_break().unwrap();
        assert_eq!(body(writer), "a\\par\r\n\\tab \\page ");
    }

    #[test]
    fn test_write_char_escapes() {
        let mut writer = open_rtf();
        writer.write_text(b"a\\b{c}").unwrap();
        assert_eq!(body(writer), "a\\\\b\\{c\\}");
    }

    #[test]
    fn test_write_char_strip_high_bits() {
        let mut writer = StyledWriter::new(WriterOptions::new().with_strip_high_bits(true));
        writer.begin(BeginFlags::NONE).unwrap();
        // 0xdc folds to a backslash, which must still be escaped
        writer.write_text(&[0xc8, 0xc9, 0x01, 0xdc]).unwrap();
        assert_eq!(body(writer), "HI.\\\\");
    }

    #[test]
    fn test_write_char_raw_high_bits() {
        let mut writer = open_rtf();
        writer.write_char(0xe9).unwrap();
        writer.write_gs_char(0x8e).unwrap();
        writer.end().unwrap();
        let bytes = writer.finish().unwrap().into_bytes();
        let tail = &bytes[bytes.len() - 5..];
        assert_eq!(tail, &[0xe9, 0xe9, b'}', b'\r', b'\n']);
    }

    #[test]
    fn test_write_raw_not_escaped() {
        let mut writer = open_rtf();
        writer.write_raw(b"\\b bold").unwrap();
        assert_eq!(body(writer), "\\b bold");
    }

    #[test]
    fn test_quoted_char() {
        let mut writer = StyledWriter::new(WriterOptions::new().with_format(TextFormat::Csv));
        writer.begin(BeginFlags::NONE).unwrap();
        for &b in b"say \"hi\"" {
            writer.write_quoted_char(b).unwrap();
        }
        writer.end().unwrap();
        let doc = writer.finish().unwrap();
        assert_eq!(doc.as_bytes(), b"say \"\"hi\"\"");
        assert_eq!(doc.kind, crate::model::ContentKind::Csv);
    }

    #[test]
    fn test_gs_font_and_size() {
        let mut writer = open_rtf();
        writer.set_gs_font_size(10).unwrap();
        writer.set_gs_font(GsFontFamily::COURIER).unwrap();
        writer.set_gs_font_style(QdStyle(QdStyle::BOLD | QdStyle::SUBSCRIPT)).unwrap();
        writer.set_gs_font_style(QdStyle(0)).unwrap();
        assert_eq!(body(writer), "\\fs20 \\fs18 \\b \\sub \\b0 \\nosupersub ");
    }

    #[test]
    fn test_sequence_errors() {
        let mut writer = StyledWriter::rtf();
        assert!(matches!(writer.write_char(b'a'), Err(Error::Sequence(_))));
        assert!(matches!(writer.set_bold(true), Err(Error::Sequence(_))));
        assert!(matches!(writer.end(), Err(Error::Sequence(_))));

        writer.begin(BeginFlags::NONE).unwrap();
        assert!(matches!(
            writer.begin(BeginFlags::NONE),
            Err(Error::Sequence(_))
        ));
        writer.end().unwrap();
        assert!(matches!(writer.new_paragraph(), Err(Error::Sequence(_))));
        assert!(matches!(writer.end(), Err(Error::Sequence(_))));
        assert!(matches!(
            writer.begin(BeginFlags::NONE),
            Err(Error::Sequence(_))
        ));
    }

    #[test]
    fn test_finish_before_end() {
        let mut writer = StyledWriter::rtf();
        writer.begin(BeginFlags::NONE).unwrap();
        assert!(matches!(writer.finish(), Err(Error::Sequence(_))));
    }

    #[test]
    fn test_plain_mode_ignores_styles() {
        let mut writer = StyledWriter::plain(false);
        writer.begin(BeginFlags::COLOR_TABLE).unwrap();
        writer.set_bold(true).unwrap();
        writer.write_text(b"{x}\ty").unwrap();
        writer.new_paragraph().unwrap();
        writer.end().unwrap();
        let doc = writer.finish().unwrap();
        assert_eq!(doc.as_bytes(), b"{x}\ty\r\n");
        assert_eq!(doc.kind, crate::model::ContentKind::Text);
    }
}
