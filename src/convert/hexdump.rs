//! Hex dump converter, the fallback for any non-empty part.

use super::{part_data, ConvertOptions, DocumentConverter};
use crate::error::Result;
use crate::model::{Applicability, PartKind, ReformatHolder, StyledDocument};
use crate::render::{hex_dump, BeginFlags, StyledWriter};

/// Renders any non-empty part as offset, hex and character columns.
///
/// Always applicable, so the dispatcher falls back to it when no other
/// converter claims a part.
#[derive(Debug, Default, Clone, Copy)]
pub struct HexDumpConverter;

impl HexDumpConverter {
    /// Create a hex dump converter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for HexDumpConverter {
    fn name(&self) -> &str {
        "hex-dump"
    }

    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability {
        match holder.part(part) {
            Some(data) if !data.is_empty() => Applicability::Always,
            _ => Applicability::Not,
        }
    }

    fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<StyledDocument> {
        let data = part_data(holder, part)?;

        // The printable column is folded by the dump itself.
        let mut writer = StyledWriter::new(options.writer_options(false));
        writer.begin(BeginFlags::NONE)?;
        hex_dump(&mut writer, data, options.hex_dump_columns)?;
        writer.end()?;
        writer.finish()
    }
}
