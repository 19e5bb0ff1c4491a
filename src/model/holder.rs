//! Source file parts and per-converter applicability.

use super::FileTypeTag;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which fork or stream of a multi-part file to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Data fork
    Data,
    /// Resource fork
    Resource,
    /// File comment
    Comment,
}

impl PartKind {
    /// Every part kind, in display order.
    pub const ALL: [PartKind; 3] = [PartKind::Data, PartKind::Resource, PartKind::Comment];

    fn slot(self) -> usize {
        match self {
            PartKind::Data => 0,
            PartKind::Resource => 1,
            PartKind::Comment => 2,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartKind::Data => "data",
            PartKind::Resource => "resource",
            PartKind::Comment => "comment",
        })
    }
}

/// How well a converter fits a part.
///
/// Ordered from worst to best fit. [`Applicability::Always`] is for
/// converters that accept anything (hex dump) and so rank below any
/// converter that actually recognizes the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    Not,
    Always,
    ProbablyNot,
    Probably,
    Yes,
}

impl Applicability {
    /// Check if the converter may be used at all.
    pub fn is_applicable(self) -> bool {
        self != Applicability::Not
    }
}

/// A legacy file handed to the dispatcher: its type, its parts, and the
/// applicability results recorded by `examine`.
///
/// Part data is borrowed for the lifetime of the holder and never copied.
#[derive(Debug, Clone)]
pub struct ReformatHolder<'a> {
    file_type: FileTypeTag,
    aux_type: u16,
    name: Option<String>,
    parts: [Option<&'a [u8]>; 3],
    applicability: HashMap<(String, PartKind), Applicability>,
    examined: bool,
}

impl<'a> ReformatHolder<'a> {
    /// Create a holder for a file of the given type with no parts.
    pub fn new(file_type: FileTypeTag) -> Self {
        Self {
            file_type,
            aux_type: 0,
            name: None,
            parts: [None; 3],
            applicability: HashMap::new(),
            examined: false,
        }
    }

    /// Create a holder with only a data fork.
    pub fn with_data(file_type: FileTypeTag, data: &'a [u8]) -> Self {
        Self::new(file_type).with_part(PartKind::Data, data)
    }

    /// Set the auxiliary type (load address, record length, subtype).
    pub fn with_aux_type(mut self, aux_type: u16) -> Self {
        self.aux_type = aux_type;
        self
    }

    /// Set the file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach one part.
    pub fn with_part(mut self, kind: PartKind, data: &'a [u8]) -> Self {
        self.parts[kind.slot()] = Some(data);
        self
    }

    /// The file type.
    pub fn file_type(&self) -> FileTypeTag {
        self.file_type
    }

    /// The auxiliary type.
    pub fn aux_type(&self) -> u16 {
        self.aux_type
    }

    /// The file name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The bytes of one part, if present.
    pub fn part(&self, kind: PartKind) -> Option<&'a [u8]> {
        self.parts[kind.slot()]
    }

    /// Kinds of the parts that are present.
    pub fn part_kinds(&self) -> impl Iterator<Item = PartKind> + '_ {
        PartKind::ALL
            .into_iter()
            .filter(move |kind| self.parts[kind.slot()].is_some())
    }

    /// Check if `examine` has run on this holder.
    pub fn is_examined(&self) -> bool {
        self.examined
    }

    pub(crate) fn mark_examined(&mut self) {
        self.examined = true;
    }

    pub(crate) fn clear_applicability(&mut self) {
        self.applicability.clear();
        self.examined = false;
    }

    pub(crate) fn set_applicability(
        &mut self,
        converter: &str,
        part: PartKind,
        applicability: Applicability,
    ) {
        self.applicability
            .insert((converter.to_string(), part), applicability);
    }

    /// The recorded applicability of a converter for a part.
    pub fn applicability(&self, converter: &str, part: PartKind) -> Option<Applicability> {
        self.applicability
            .get(&(converter.to_string(), part))
            .copied()
    }

    /// Converters that claimed a part, best fit first.
    ///
    /// Ties keep name order so the result is deterministic.
    pub fn applicable(&self, part: PartKind) -> Vec<(&str, Applicability)> {
        let mut found: Vec<_> = self
            .applicability
            .iter()
            .filter(|((_, p), a)| *p == part && a.is_applicable())
            .map(|((name, _), a)| (name.as_str(), *a))
            .collect();
        found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        found
    }
}
