//! Plain text converter.

use super::{part_data, ConvertOptions, DocumentConverter};
use crate::error::Result;
use crate::model::{Applicability, PartKind, ReformatHolder, StyledDocument};
use crate::render::{convert_eol, looks_high_ascii, looks_like_text, BeginFlags, StyledWriter};

/// Converts text files, with any mix of CR, LF and CRLF line ends.
///
/// High-bit text is folded to ASCII when the options ask for it, or when
/// most of the file has the high bit set and the options leave it open.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextConverter;

impl TextConverter {
    /// Create a text converter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for TextConverter {
    fn name(&self) -> &str {
        "text"
    }

    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability {
        let Some(data) = holder.part(part) else {
            return Applicability::Not;
        };

        match part {
            PartKind::Resource => Applicability::Not,
            PartKind::Comment => Applicability::Yes,
            PartKind::Data if holder.file_type().is_text() => Applicability::Yes,
            PartKind::Data if looks_like_text(data) => Applicability::Probably,
            PartKind::Data => Applicability::Not,
        }
    }

    fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<StyledDocument> {
        let data = part_data(holder, part)?;
        let strip = options
            .strip_high_bits
            .unwrap_or_else(|| looks_high_ascii(data));
        log::debug!("text: {} bytes, strip high bits: {}", data.len(), strip);

        let mut writer = StyledWriter::new(options.writer_options(strip));
        writer.begin(BeginFlags::NONE)?;
        convert_eol(&mut writer, data)?;
        writer.end()?;
        writer.finish()
    }
}
