//! Whole-buffer text helpers built on [`StyledWriter`].

use super::StyledWriter;
use crate::charset::{is_text_like, to_printable};
use crate::error::Result;

/// Share of high-bit bytes above which a file is treated as high ASCII.
const HIGH_ASCII_THRESHOLD: f32 = 0.75;

/// Share of text-like bytes above which a file is treated as text.
const TEXT_THRESHOLD: f32 = 0.9;

/// Write `src` as text, turning every CR, LF or CRLF into one paragraph break.
///
/// Line ends are recognized with or without the high bit set, so Apple II
/// high-ASCII files (`0x8d`) break lines too.
pub fn convert_eol(writer: &mut StyledWriter, src: &[u8]) -> Result<()> {
    let mut bytes = src.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        match byte & 0x7f {
            b'\r' => {
                if bytes.peek().map(|next| next & 0x7f) == Some(b'\n') {
                    bytes.next();
                }
                writer.new_paragraph()?;
            }
            b'\n' => writer.new_paragraph()?,
            _ => writer.write_char(byte)?,
        }
    }

    Ok(())
}

/// Write a hex dump of `src`, `columns` bytes per line.
///
/// Each line holds the offset, the bytes in hex, and the bytes folded to
/// printable ASCII.
pub fn hex_dump(writer: &mut StyledWriter, src: &[u8], columns: usize) -> Result<()> {
    let columns = columns.max(1);

    for (line, chunk) in src.chunks(columns).enumerate() {
        let mut hex = format!("{:06x}:", line * columns);
        for byte in chunk {
            hex.push_str(&format!(" {:02x}", byte));
        }
        for _ in chunk.len()..columns {
            hex.push_str("   ");
        }
        hex.push_str("  ");
        writer.write_raw(hex.as_bytes())?;

        for &byte in chunk {
            writer.write_char(to_printable(byte))?;
        }
        writer.new_paragraph()?;
    }

    Ok(())
}

/// Check if most bytes have the high bit set, as in DOS 3.3 text files.
pub fn looks_high_ascii(src: &[u8]) -> bool {
    if src.is_empty() {
        return false;
    }
    let high = src.iter().filter(|&&byte| byte & 0x80 != 0).count();
    high as f32 / src.len() as f32 > HIGH_ASCII_THRESHOLD
}

/// Check if the buffer is mostly printable text, ignoring the high bit.
pub fn looks_like_text(src: &[u8]) -> bool {
    if src.is_empty() {
        return false;
    }
    let text = src.iter().filter(|&&byte| is_text_like(byte)).count();
    text as f32 / src.len() as f32 > TEXT_THRESHOLD
}
