//! Styled text output: the RTF writer, its options and style state,
//! whole-buffer text helpers, and JSON reports.

mod json;
mod options;
mod style;
mod text;
mod writer;

pub use json::{to_json, ConverterFit, ExamineReport, JsonFormat, PartReport};
pub use options::{BeginFlags, TextFormat, WriterOptions};
pub use style::{GsFontFamily, Justification, QdStyle, RtfFont, StyleState, TextColor};
pub use text::{convert_eol, hex_dump, looks_high_ascii, looks_like_text};
pub use writer::StyledWriter;
