//! Data model for reformat inputs and outputs.
//!
//! Inputs are legacy files described by a [`ReformatHolder`]; outputs are
//! either a [`BitmapImage`] or a [`StyledDocument`], wrapped in a
//! [`ConversionTarget`].

mod bitmap;
mod document;
mod file_type;
mod holder;
mod target;

pub use bitmap::{BitmapImage, PaletteColor, PaletteEntry, APPLE_II_PALETTE};
pub use document::{ContentKind, StyledDocument};
pub use file_type::FileTypeTag;
pub use holder::{Applicability, PartKind, ReformatHolder};
pub use target::ConversionTarget;
