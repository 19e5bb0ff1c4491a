//! Decoding options.

use serde::Serialize;

/// Error handling mode for cursor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail with an underflow error when a read runs past the end
    #[default]
    Strict,
    /// Return an all-ones sentinel without advancing, and keep going
    Lenient,
}

impl ErrorMode {
    /// Check if this is the lenient compatibility mode.
    pub fn is_lenient(self) -> bool {
        matches!(self, ErrorMode::Lenient)
    }
}
