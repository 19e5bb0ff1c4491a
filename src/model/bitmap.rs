//! Device-independent bitmap output.

use crate::error::{Error, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;

/// One palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PaletteEntry {
    /// Create a palette entry.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Names for the 16 entries of [`APPLE_II_PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PaletteColor {
    Black,
    Red,
    DarkBlue,
    Purple,
    DarkGreen,
    DarkGrey,
    MediumBlue,
    LightBlue,
    Brown,
    Orange,
    LightGrey,
    Pink,
    Green,
    Yellow,
    Aqua,
    White,
}

impl PaletteColor {
    /// Index into the palette.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The color value.
    pub fn entry(self) -> PaletteEntry {
        APPLE_II_PALETTE[self as usize]
    }
}

/// The Apple II 16-color palette used by every graphics conversion.
pub static APPLE_II_PALETTE: [PaletteEntry; 16] = [
    PaletteEntry::rgb(0x00, 0x00, 0x00), // black
    PaletteEntry::rgb(0xdd, 0x00, 0x33), // red
    PaletteEntry::rgb(0x00, 0x00, 0x99), // dark blue
    PaletteEntry::rgb(0xdd, 0x22, 0xdd), // purple
    PaletteEntry::rgb(0x00, 0x77, 0x22), // dark green
    PaletteEntry::rgb(0x55, 0x55, 0x55), // dark grey
    PaletteEntry::rgb(0x22, 0x22, 0xff), // medium blue
    PaletteEntry::rgb(0x66, 0xaa, 0xff), // light blue
    PaletteEntry::rgb(0x88, 0x55, 0x00), // brown
    PaletteEntry::rgb(0xff, 0x66, 0x00), // orange
    PaletteEntry::rgb(0xaa, 0xaa, 0xaa), // light grey
    PaletteEntry::rgb(0xff, 0x99, 0x88), // pink
    PaletteEntry::rgb(0x11, 0xdd, 0x00), // green
    PaletteEntry::rgb(0xff, 0xff, 0x00), // yellow
    PaletteEntry::rgb(0x44, 0xff, 0x99), // aqua
    PaletteEntry::rgb(0xff, 0xff, 0xff), // white
];

const BMP_FILE_HEADER_LEN: u32 = 14;
const BMP_INFO_HEADER_LEN: u32 = 40;
const BMP_PIXELS_PER_METER: i32 = 2835; // 72 DPI

/// Largest pixel buffer a bitmap may allocate.
const MAX_PIXEL_BYTES: usize = 1 << 28;

/// A pixel buffer with its geometry and palette, independent of any display API.
///
/// Rows are stored top to bottom, each packed into `stride()` bytes with no
/// padding. Indexed depths (1, 4, 8) pack pixels most significant bits
/// first; 24-bit pixels are stored as red, green, blue.
#[derive(Debug, Clone, Serialize)]
pub struct BitmapImage {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Bits per pixel: 1, 4, 8 or 24
    pub depth: u8,

    /// Row-major pixel data
    #[serde(skip_serializing)]
    pixels: Vec<u8>,

    /// Color table for indexed depths
    pub palette: Option<Cow<'static, [PaletteEntry]>>,
}

impl BitmapImage {
    /// Create a zero-filled bitmap.
    ///
    /// Dimensions must fit the signed 32-bit BMP header fields, and the
    /// pixel buffer must stay under 256 MiB.
    pub fn new(width: u32, height: u32, depth: u8) -> Result<Self> {
        if !matches!(depth, 1 | 4 | 8 | 24) {
            return Err(Error::InvalidArgument(format!(
                "unsupported pixel depth {}",
                depth
            )));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "empty bitmap {}x{}",
                width, height
            )));
        }
        let len = Self::pixel_len(width, height, depth)
            .filter(|&len| len <= MAX_PIXEL_BYTES)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "bitmap {}x{} at {} bits per pixel is too large",
                    width, height, depth
                ))
            })?;
        Ok(Self {
            width,
            height,
            depth,
            pixels: vec![0; len],
            palette: None,
        })
    }

    /// Use a shared process-wide palette, such as [`APPLE_II_PALETTE`].
    pub fn with_palette(mut self, palette: &'static [PaletteEntry]) -> Self {
        self.palette = Some(Cow::Borrowed(palette));
        self
    }

    /// Use a palette read from the source file.
    pub fn with_custom_palette(mut self, palette: Vec<PaletteEntry>) -> Self {
        self.palette = Some(Cow::Owned(palette));
        self
    }

    /// Pixel buffer size, or `None` if the geometry cannot be stored or
    /// written as a BMP.
    fn pixel_len(width: u32, height: u32, depth: u8) -> Option<usize> {
        i32::try_from(width).ok()?;
        i32::try_from(height).ok()?;
        let stride = (width as usize).checked_mul(depth as usize)?.div_ceil(8);
        let padded = stride.checked_next_multiple_of(4)?;
        u32::try_from(padded.checked_mul(height as usize)?).ok()?;
        stride.checked_mul(height as usize)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        (self.width as usize * self.depth as usize).div_ceil(8)
    }

    /// All pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// All pixel data, mutable. Run-length decoders write straight into this.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// One row of pixel data.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// One row of pixel data, mutable.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.pixels[start..start + stride]
    }

    /// Set a palette index at `(x, y)` in an indexed bitmap.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidArgument(format!(
                "pixel ({}, {}) outside {}x{} bitmap",
                x, y, self.width, self.height
            )));
        }
        let depth = self.depth as usize;
        if depth > 8 {
            return Err(Error::InvalidArgument(
                "set_index needs an indexed bitmap".into(),
            ));
        }
        let bit = x as usize * depth;
        let shift = 8 - depth - bit % 8;
        let mask = (((1u16 << depth) - 1) as u8) << shift;
        let stride = self.stride();
        let byte = &mut self.pixels[y as usize * stride + bit / 8];
        *byte = (*byte & !mask) | ((index << shift) & mask);
        Ok(())
    }

    /// Read the palette index at `(x, y)` in an indexed bitmap.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height || self.depth > 8 {
            return None;
        }
        let depth = self.depth as usize;
        let bit = x as usize * depth;
        let shift = 8 - depth - bit % 8;
        let mask = ((1u16 << depth) - 1) as u8;
        Some((self.row(y)[bit / 8] >> shift) & mask)
    }

    /// Serialize as a Windows BMP file.
    pub fn to_bmp(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.pixels.len() + 1024);
        self.write_bmp(&mut out)?;
        Ok(out)
    }

    /// Write as a Windows BMP file.
    pub fn write_bmp<W: Write>(&self, out: &mut W) -> Result<()> {
        let palette = self.bmp_palette();
        let padded_stride = self.stride().div_ceil(4) * 4;
        let pixel_offset = BMP_FILE_HEADER_LEN + BMP_INFO_HEADER_LEN + 4 * palette.len() as u32;

        let header_fields = (
            padded_stride
                .checked_mul(self.height as usize)
                .and_then(|len| u32::try_from(len).ok())
                .and_then(|len| Some((len, len.checked_add(pixel_offset)?))),
            i32::try_from(self.width),
            i32::try_from(self.height),
        );
        let (Some((image_len, file_len)), Ok(width), Ok(height)) = header_fields else {
            return Err(Error::InvalidArgument(format!(
                "bitmap {}x{} does not fit a BMP header",
                self.width, self.height
            )));
        };

        out.write_all(b"BM")?;
        out.write_all(&file_len.to_le_bytes())?;
        out.write_all(&[0u8; 4])?;
        out.write_all(&pixel_offset.to_le_bytes())?;

        out.write_all(&BMP_INFO_HEADER_LEN.to_le_bytes())?;
        out.write_all(&width.to_le_bytes())?;
        out.write_all(&height.to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?;
        out.write_all(&(self.depth as u16).to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&image_len.to_le_bytes())?;
        out.write_all(&BMP_PIXELS_PER_METER.to_le_bytes())?;
        out.write_all(&BMP_PIXELS_PER_METER.to_le_bytes())?;
        out.write_all(&(palette.len() as u32).to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;

        for entry in &palette {
            out.write_all(&[entry.blue, entry.green, entry.red, 0])?;
        }

        let mut line = vec![0u8; padded_stride];
        for y in (0..self.height).rev() {
            let row = self.row(y);
            line[..row.len()].copy_from_slice(row);
            if self.depth == 24 {
                for px in line[..row.len()].chunks_exact_mut(3) {
                    px.swap(0, 2);
                }
            }
            out.write_all(&line)?;
        }

        Ok(())
    }

    /// Color table to write: the bitmap's own, or a grey ramp.
    fn bmp_palette(&self) -> Vec<PaletteEntry> {
        if self.depth > 8 {
            return Vec::new();
        }
        let max = 1usize << self.depth;
        match &self.palette {
            Some(palette) => palette.iter().take(max).copied().collect(),
            None => (0..max)
                .map(|i| {
                    let level = (i * 255 / (max - 1)) as u8;
                    PaletteEntry::rgb(level, level, level)
                })
                .collect(),
        }
    }
}
