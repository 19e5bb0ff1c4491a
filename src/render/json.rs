//! JSON rendering for examine results and conversion metadata.

use crate::error::{Error, Result};
use crate::model::{Applicability, PartKind, ReformatHolder};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One converter's answer for one part.
#[derive(Debug, Clone, Serialize)]
pub struct ConverterFit<'a> {
    pub converter: &'a str,
    pub applicability: Applicability,
}

/// Applicable converters for one part, best first.
#[derive(Debug, Clone, Serialize)]
pub struct PartReport<'a> {
    pub part: PartKind,
    pub size: usize,
    pub converters: Vec<ConverterFit<'a>>,
}

/// Everything `examine` recorded about a file.
#[derive(Debug, Clone, Serialize)]
pub struct ExamineReport<'a> {
    pub name: Option<&'a str>,
    pub file_type: String,
    pub aux_type: u16,
    pub parts: Vec<PartReport<'a>>,
}

impl<'a> ExamineReport<'a> {
    /// Collect the recorded results from an examined holder.
    pub fn from_holder(holder: &'a ReformatHolder<'_>) -> Self {
        let parts = holder
            .part_kinds()
            .map(move |part| PartReport {
                part,
                size: holder.part(part).map_or(0, <[u8]>::len),
                converters: holder
                    .applicable(part)
                    .into_iter()
                    .map(|(converter, applicability)| ConverterFit {
                        converter,
                        applicability,
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: holder.name(),
            file_type: holder.file_type().abbreviation(),
            aux_type: holder.aux_type(),
            parts,
        }
    }
}

/// Serialize any report or result to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
}
