//! Conversion results.

use super::{BitmapImage, StyledDocument};
use crate::error::Result;
use serde::Serialize;

/// The artifact produced by converting one part.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversionTarget {
    /// Graphics converted to a bitmap
    Bitmap(BitmapImage),
    /// Text converted to a styled document
    Document(StyledDocument),
}

impl ConversionTarget {
    /// The bitmap, if this is a graphics result.
    pub fn as_bitmap(&self) -> Option<&BitmapImage> {
        match self {
            ConversionTarget::Bitmap(bitmap) => Some(bitmap),
            ConversionTarget::Document(_) => None,
        }
    }

    /// The document, if this is a text result.
    pub fn as_document(&self) -> Option<&StyledDocument> {
        match self {
            ConversionTarget::Document(doc) => Some(doc),
            ConversionTarget::Bitmap(_) => None,
        }
    }

    /// Conventional file extension for saving the result.
    pub fn extension(&self) -> &'static str {
        match self {
            ConversionTarget::Bitmap(_) => "bmp",
            ConversionTarget::Document(doc) => doc.kind.extension(),
        }
    }

    /// Serialized bytes for saving the result.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            ConversionTarget::Bitmap(bitmap) => bitmap.to_bmp(),
            ConversionTarget::Document(doc) => Ok(doc.as_bytes().to_vec()),
        }
    }
}

impl From<BitmapImage> for ConversionTarget {
    fn from(bitmap: BitmapImage) -> Self {
        ConversionTarget::Bitmap(bitmap)
    }
}

impl From<StyledDocument> for ConversionTarget {
    fn from(doc: StyledDocument) -> Self {
        ConversionTarget::Document(doc)
    }
}
