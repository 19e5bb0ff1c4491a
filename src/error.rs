//! Error types for the reformat library.

use std::io;
use thiserror::Error;

/// Result type alias for reformat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding or converting legacy files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing converted output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A cursor read needed more bytes than remain.
    #[error("Buffer underflow: needed {needed} bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },

    /// A decode would write past the destination capacity.
    #[error("Output overflow: needed {needed} bytes, capacity {capacity}")]
    Overflow { needed: usize, capacity: usize },

    /// A run was cut short by the end of the input.
    #[error("Truncated input: run needs {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    /// The styled writer was used out of order.
    #[error("Writer sequence error: {0}")]
    Sequence(&'static str),

    /// A converter claimed a part but failed to convert it.
    #[error("Conversion by '{converter}' failed: {source}")]
    Conversion {
        converter: String,
        #[source]
        source: Box<Error>,
    },

    /// The requested converter did not claim the part, or it was never examined.
    #[error("Converter '{converter}' is not applicable to the {part} part")]
    NotApplicable { converter: String, part: String },

    /// No converter is registered under this name.
    #[error("Unknown converter: {0}")]
    UnknownConverter(String),

    /// A parameter was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap this error as a failure of the named converter.
    ///
    /// Sequence errors and errors that are already conversion failures pass
    /// through unchanged.
    pub fn in_converter(self, converter: &str) -> Self {
        match self {
            Error::Sequence(_) | Error::Conversion { .. } => self,
            other => Error::Conversion {
                converter: converter.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Check if this error reports writer misuse.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Error::Sequence(_))
    }
}
