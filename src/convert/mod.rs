//! Converter dispatch: the two-phase examine / process contract.
//!
//! Converters come in two families. A [`GraphicsConverter`] turns a part
//! into a [`BitmapImage`]; a [`DocumentConverter`] turns it into a
//! [`StyledDocument`]. Both answer the same two questions: how well do you
//! fit this part (`examine`), and convert it (`process`).
//!
//! # Example
//!
//! ```
//! use reformat::convert::{ConvertOptions, ReformatDispatcher};
//! use reformat::model::{FileTypeTag, PartKind, ReformatHolder};
//!
//! let dispatcher = ReformatDispatcher::with_defaults();
//! let mut holder = ReformatHolder::with_data(FileTypeTag::Txt, b"HELLO\r");
//! dispatcher.examine(&mut holder);
//!
//! let best = holder.applicable(PartKind::Data)[0].0;
//! assert_eq!(best, "text");
//!
//! let target = dispatcher.process(&holder, best, PartKind::Data, &ConvertOptions::default())?;
//! assert!(target.as_document().is_some());
//! # Ok::<(), reformat::Error>(())
//! ```

mod hexdump;
mod text;

pub use hexdump::HexDumpConverter;
pub use text::TextConverter;

use crate::decode::{ByteCursor, ErrorMode};
use crate::error::{Error, Result};
use crate::model::{
    Applicability, BitmapImage, ConversionTarget, PartKind, ReformatHolder, StyledDocument,
};
use crate::render::{TextFormat, WriterOptions};
use std::collections::HashMap;
use std::sync::Arc;

/// Options for conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Produce RTF rather than plain text where the converter supports both
    pub use_rtf: bool,

    /// Fold high-bit text to printable ASCII; `None` detects it from the data
    pub strip_high_bits: Option<bool>,

    /// How cursor reads past the end of the data are handled
    pub error_mode: ErrorMode,

    /// Bytes per line in hex dumps
    pub hex_dump_columns: usize,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable RTF output.
    pub fn with_rtf(mut self, use_rtf: bool) -> Self {
        self.use_rtf = use_rtf;
        self
    }

    /// Force high-bit stripping on or off.
    pub fn with_strip_high_bits(mut self, strip: bool) -> Self {
        self.strip_high_bits = Some(strip);
        self
    }

    /// Set the cursor error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Use the lenient compatibility mode for damaged files.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the number of bytes per hex dump line.
    pub fn with_hex_columns(mut self, columns: usize) -> Self {
        self.hex_dump_columns = columns.max(1);
        self
    }

    /// Writer options for a text conversion.
    pub fn writer_options(&self, strip_high_bits: bool) -> WriterOptions {
        let format = if self.use_rtf {
            TextFormat::Rtf
        } else {
            TextFormat::Plain
        };
        WriterOptions::new()
            .with_format(format)
            .with_strip_high_bits(strip_high_bits)
    }

    /// A cursor over `data` honoring the configured error mode.
    pub fn cursor<'a>(&self, data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor::new(data).with_mode(self.error_mode)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            use_rtf: true,
            strip_high_bits: None,
            error_mode: ErrorMode::Strict,
            hex_dump_columns: 16,
        }
    }
}

/// A converter that produces bitmaps.
pub trait GraphicsConverter: Send + Sync {
    /// Unique converter name.
    fn name(&self) -> &str;

    /// Report how well this converter fits one part, without converting it.
    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability;

    /// Convert one part.
    fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<BitmapImage>;
}

/// A converter that produces styled documents.
pub trait DocumentConverter: Send + Sync {
    /// Unique converter name.
    fn name(&self) -> &str;

    /// Report how well this converter fits one part, without converting it.
    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability;

    /// Convert one part.
    fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<StyledDocument>;
}

/// A registered converter of either family.
#[derive(Clone)]
pub enum Converter {
    Graphics(Arc<dyn GraphicsConverter>),
    Document(Arc<dyn DocumentConverter>),
}

impl Converter {
    /// The converter's name.
    pub fn name(&self) -> &str {
        match self {
            Converter::Graphics(c) => c.name(),
            Converter::Document(c) => c.name(),
        }
    }

    /// Check if this converter produces bitmaps.
    pub fn is_graphics(&self) -> bool {
        matches!(self, Converter::Graphics(_))
    }

    /// Report how well this converter fits one part.
    pub fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability {
        match self {
            Converter::Graphics(c) => c.examine(holder, part),
            Converter::Document(c) => c.examine(holder, part),
        }
    }

    /// Convert one part.
    pub fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<ConversionTarget> {
        match self {
            Converter::Graphics(c) => c.process(holder, part, options).map(Into::into),
            Converter::Document(c) => c.process(holder, part, options).map(Into::into),
        }
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let family = if self.is_graphics() {
            "Graphics"
        } else {
            "Document"
        };
        write!(f, "{}({:?})", family, self.name())
    }
}

/// Registry of converters and driver of the examine / process protocol.
pub struct ReformatDispatcher {
    converters: Vec<Converter>,
    by_name: HashMap<String, usize>,
}

impl ReformatDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a dispatcher with the built-in text and hex dump converters.
    pub fn with_defaults() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register_document(Arc::new(TextConverter::new()));
        dispatcher.register_document(Arc::new(HexDumpConverter::new()));
        dispatcher
    }

    /// Register a converter, replacing any converter with the same name.
    pub fn register(&mut self, converter: Converter) {
        let key = converter.name().to_lowercase();
        match self.by_name.get(&key) {
            Some(&idx) => self.converters[idx] = converter,
            None => {
                self.by_name.insert(key, self.converters.len());
                self.converters.push(converter);
            }
        }
    }

    /// Register a graphics converter.
    pub fn register_graphics(&mut self, converter: Arc<dyn GraphicsConverter>) {
        self.register(Converter::Graphics(converter));
    }

    /// Register a document converter.
    pub fn register_document(&mut self, converter: Arc<dyn DocumentConverter>) {
        self.register(Converter::Document(converter));
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Converter> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.converters[idx])
    }

    /// Names of all registered converters, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Ask every converter about every present part and record the answers
    /// on the holder. Nothing is converted.
    ///
    /// Results from an earlier `examine` are discarded.
    pub fn examine(&self, holder: &mut ReformatHolder<'_>) {
        holder.clear_applicability();
        let parts: Vec<PartKind> = holder.part_kinds().collect();

        for part in parts {
            for converter in &self.converters {
                let applicability = converter.examine(holder, part);
                log::debug!(
                    "{} {} part: {} -> {:?}",
                    holder.file_type(),
                    part,
                    converter.name(),
                    applicability
                );
                holder.set_applicability(converter.name(), part, applicability);
            }
        }

        holder.mark_examined();
    }

    /// Convert one examined part with the named converter.
    ///
    /// Fails with [`Error::NotApplicable`] if the holder was not examined or
    /// the converter did not claim the part. Failures inside the converter
    /// come back as [`Error::Conversion`], except writer sequence errors,
    /// which are returned unchanged.
    pub fn process(
        &self,
        holder: &ReformatHolder<'_>,
        name: &str,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<ConversionTarget> {
        let converter = self
            .get_by_name(name)
            .ok_or_else(|| Error::UnknownConverter(name.to_string()))?;

        let claimed = holder
            .applicability(converter.name(), part)
            .is_some_and(Applicability::is_applicable);
        if !holder.is_examined() || !claimed {
            return Err(Error::NotApplicable {
                converter: converter.name().to_string(),
                part: part.to_string(),
            });
        }

        converter.process(holder, part, options).map_err(|err| {
            if err.is_sequence() {
                log::error!("{} misused the styled writer: {}", converter.name(), err);
                err
            } else {
                log::warn!("{} failed on {} part: {}", converter.name(), part, err);
                err.in_converter(converter.name())
            }
        })
    }

    /// Convert one examined part with the best-fitting converter.
    pub fn process_best(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<ConversionTarget> {
        let applicable = holder.applicable(part);
        let (name, _) = applicable.first().ok_or_else(|| Error::NotApplicable {
            converter: "any".to_string(),
            part: part.to_string(),
        })?;
        self.process(holder, name, part, options)
    }
}

impl Default for ReformatDispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The bytes of a part, or an error naming the missing part.
pub(crate) fn part_data<'a>(holder: &ReformatHolder<'a>, part: PartKind) -> Result<&'a [u8]> {
    holder
        .part(part)
        .ok_or_else(|| Error::Other(format!("file has no {} part", part)))
}
