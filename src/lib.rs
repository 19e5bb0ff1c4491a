//! # reformat
//!
//! Conversion core for legacy 8-bit computer files.
//!
//! This library takes files from old Apple II disk images (text, packed
//! graphics, word processor documents) and turns them into modern outputs:
//! RTF or plain text documents and palette bitmaps.
//!
//! ## Quick Start
//!
//! ```
//! use reformat::{convert_bytes, ConvertOptions, FileTypeTag};
//!
//! fn main() -> reformat::Result<()> {
//!     // High-ASCII text, as written by DOS 3.3
//!     let data = [0xc8, 0xc5, 0xcc, 0xcc, 0xcf, 0x8d];
//!
//!     let options = ConvertOptions::new().with_rtf(false);
//!     let target = convert_bytes(&data, FileTypeTag::Txt, &options)?;
//!     assert_eq!(target.to_bytes()?, b"HELLO\r\n");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounds-checked decoding**: [`ByteCursor`] never reads past its buffer
//! - **Run-length unpacking**: PackBits and the Apple IIgs variant
//! - **Styled output**: RTF with fonts, colors, margins and justification
//! - **Pluggable converters**: a two-phase examine / process protocol

pub mod charset;
pub mod convert;
pub mod decode;
pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, Converter, DocumentConverter, GraphicsConverter, HexDumpConverter,
    ReformatDispatcher, TextConverter,
};
pub use decode::{ByteCursor, Endian, ErrorMode, RunLengthParams, RunLengthUnpacker};
pub use error::{Error, Result};
pub use model::{
    Applicability, BitmapImage, ContentKind, ConversionTarget, FileTypeTag, PaletteEntry,
    PartKind, ReformatHolder, StyledDocument,
};
pub use render::{StyledWriter, TextFormat, WriterOptions};

use std::path::Path;

/// Examine a data fork with the built-in converters.
///
/// Returns the applicable converters, best fit first.
///
/// # Example
///
/// ```
/// use reformat::{examine_bytes, Applicability, FileTypeTag};
///
/// let found = examine_bytes(&[0x00, 0xff], FileTypeTag::Bin);
/// assert_eq!(found, vec![("hex-dump".to_string(), Applicability::Always)]);
/// ```
pub fn examine_bytes(data: &[u8], file_type: FileTypeTag) -> Vec<(String, Applicability)> {
    let mut holder = ReformatHolder::with_data(file_type, data);
    ReformatDispatcher::with_defaults().examine(&mut holder);
    holder
        .applicable(PartKind::Data)
        .into_iter()
        .map(|(name, applicability)| (name.to_string(), applicability))
        .collect()
}

/// Convert a data fork with the best-fitting built-in converter.
pub fn convert_bytes(
    data: &[u8],
    file_type: FileTypeTag,
    options: &ConvertOptions,
) -> Result<ConversionTarget> {
    Reformat::new(file_type)
        .with_options(options.clone())
        .convert_bytes(data)
}

/// Read a file and convert it with the best-fitting built-in converter.
///
/// # Example
///
/// ```no_run
/// use reformat::{convert_file, ConvertOptions, FileTypeTag};
///
/// let target = convert_file("README.TXT", FileTypeTag::Txt, &ConvertOptions::default()).unwrap();
/// std::fs::write("README.rtf", target.to_bytes().unwrap()).unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>>(
    path: P,
    file_type: FileTypeTag,
    options: &ConvertOptions,
) -> Result<ConversionTarget> {
    let data = std::fs::read(path)?;
    convert_bytes(&data, file_type, options)
}

/// Builder for one-shot conversions.
///
/// # Example
///
/// ```
/// use reformat::{FileTypeTag, Reformat};
///
/// let target = Reformat::new(FileTypeTag::Bin)
///     .with_converter("hex-dump")
///     .plain_text()
///     .convert_bytes(b"AB")?;
/// assert!(target.to_bytes()?.starts_with(b"000000: 41 42"));
/// # Ok::<(), reformat::Error>(())
/// ```
pub struct Reformat {
    file_type: FileTypeTag,
    aux_type: u16,
    converter: Option<String>,
    options: ConvertOptions,
    dispatcher: ReformatDispatcher,
}

impl Reformat {
    /// Create a builder for files of the given type.
    pub fn new(file_type: FileTypeTag) -> Self {
        Self {
            file_type,
            aux_type: 0,
            converter: None,
            options: ConvertOptions::default(),
            dispatcher: ReformatDispatcher::with_defaults(),
        }
    }

    /// Set the auxiliary type.
    pub fn with_aux_type(mut self, aux_type: u16) -> Self {
        self.aux_type = aux_type;
        self
    }

    /// Use the named converter instead of the best fit.
    pub fn with_converter(mut self, name: impl Into<String>) -> Self {
        self.converter = Some(name.into());
        self
    }

    /// Replace the conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Produce plain text instead of RTF.
    pub fn plain_text(mut self) -> Self {
        self.options.use_rtf = false;
        self
    }

    /// Use the lenient compatibility mode.
    pub fn lenient(mut self) -> Self {
        self.options.error_mode = ErrorMode::Lenient;
        self
    }

    /// Add a converter alongside the built-in ones.
    pub fn register(mut self, converter: Converter) -> Self {
        self.dispatcher.register(converter);
        self
    }

    /// Examine and convert a data fork.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConversionTarget> {
        let mut holder =
            ReformatHolder::with_data(self.file_type, data).with_aux_type(self.aux_type);
        self.dispatcher.examine(&mut holder);

        match &self.converter {
            Some(name) => self
                .dispatcher
                .process(&holder, name, PartKind::Data, &self.options),
            None => self
                .dispatcher
                .process_best(&holder, PartKind::Data, &self.options),
        }
    }

    /// Read a file, then examine and convert it.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConversionTarget> {
        let data = std::fs::read(path)?;
        self.convert_bytes(&data)
    }
}
