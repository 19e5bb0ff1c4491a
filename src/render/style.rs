//! Style attributes tracked by the styled writer.

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
    Full,
}

impl Justification {
    /// RTF paragraph control word. Left is the RTF default and has none.
    pub(crate) fn control_word(self) -> &'static str {
        match self {
            Justification::Left => "",
            Justification::Right => "\\qr",
            Justification::Center => "\\qc",
            Justification::Full => "\\qj",
        }
    }
}

/// Font slots declared in the RTF font table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RtfFont {
    /// Monospace default
    #[default]
    CourierNew = 0,
    TimesRoman = 1,
    Arial = 2,
    Symbol = 3,
}

/// Entries of the RTF color table. `None` is the automatic color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextColor {
    #[default]
    None = 0,
    Black = 1,
    Blue = 2,
    Cyan = 3,
    Green = 4,
    Pink = 5,
    Red = 6,
    Yellow = 7,
    White = 8,
    MediumBlue = 9,
    MediumAqua = 10,
    MediumGreen = 11,
    Magenta = 12,
    MediumRed = 13,
    Olive = 14,
    MediumGrey = 15,
    LightGrey = 16,
    DarkGrey = 17,
    Orange = 18,
}

/// Apple IIgs font family number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GsFontFamily(pub u16);

impl GsFontFamily {
    pub const NEW_YORK: Self = Self(0x0002);
    pub const GENEVA: Self = Self(0x0003);
    pub const MONACO: Self = Self(0x0004);
    pub const VENICE: Self = Self(0x0005);
    pub const LONDON: Self = Self(0x0006);
    pub const ATHENS: Self = Self(0x0007);
    pub const SAN_FRANCISCO: Self = Self(0x0008);
    pub const TORONTO: Self = Self(0x0009);
    pub const CAIRO: Self = Self(0x000b);
    pub const LOS_ANGELES: Self = Self(0x000c);
    pub const TIMES: Self = Self(0x0014);
    pub const HELVETICA: Self = Self(0x0015);
    pub const COURIER: Self = Self(0x0016);
    pub const SYMBOL: Self = Self(0x0017);
    pub const TALIESIN: Self = Self(0x0018);
    pub const STARFLEET: Self = Self(0x078d);
    pub const WESTERN: Self = Self(0x088e);
    pub const GENOA: Self = Self(0x0bcb);
    pub const CLASSICAL: Self = Self(0x2baa);
    pub const CHICAGO: Self = Self(0x3fff);
    pub const GENESYS: Self = Self(0x7530);
    pub const PC_MONOSPACE: Self = Self(0x7fdc);
    pub const APPLE_M: Self = Self(0x7f58);
    /// Unnamed families seen in French AWGS documents.
    pub const UNNAMED_9C50: Self = Self(0x9c50);
    pub const UNNAMED_9C54: Self = Self(0x9c54);
    /// ROM font
    pub const SHASTON: Self = Self(0xfffe);

    /// The closest declared font, and the factor applied to IIgs point
    /// sizes when rendering in it.
    pub fn rtf_font(self) -> (RtfFont, f32) {
        match self {
            Self::COURIER | Self::MONACO | Self::PC_MONOSPACE | Self::APPLE_M => {
                (RtfFont::CourierNew, 0.9)
            }
            Self::HELVETICA | Self::GENEVA | Self::SAN_FRANCISCO | Self::CHICAGO => {
                (RtfFont::Arial, 1.0)
            }
            Self::SHASTON => (RtfFont::Arial, 1.0),
            Self::SYMBOL => (RtfFont::Symbol, 1.0),
            Self::TIMES | Self::NEW_YORK | Self::TORONTO | Self::LONDON | Self::ATHENS => {
                (RtfFont::TimesRoman, 1.0)
            }
            Self::VENICE
            | Self::CAIRO
            | Self::LOS_ANGELES
            | Self::TALIESIN
            | Self::STARFLEET
            | Self::WESTERN
            | Self::GENOA
            | Self::CLASSICAL
            | Self::GENESYS
            | Self::UNNAMED_9C50
            | Self::UNNAMED_9C54 => (RtfFont::TimesRoman, 1.0),
            other => {
                log::debug!("unknown IIgs font family {:#06x}", other.0);
                (RtfFont::TimesRoman, 1.0)
            }
        }
    }
}

/// QuickDraw II text style bits (superscript and subscript are AWGS extensions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QdStyle(pub u8);

impl QdStyle {
    pub const BOLD: u8 = 0x01;
    pub const ITALIC: u8 = 0x02;
    pub const UNDERLINE: u8 = 0x04;
    pub const OUTLINE: u8 = 0x08;
    pub const SHADOW: u8 = 0x10;
    pub const SUPERSCRIPT: u8 = 0x40;
    pub const SUBSCRIPT: u8 = 0x80;

    /// Check if a style bit is set.
    pub fn has(self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// Live style attributes of a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub justification: Justification,
    /// Left margin in tenths of an inch
    pub left_margin: u16,
    /// Right margin in tenths of an inch
    pub right_margin: u16,
    pub point_size: u16,
    pub font: RtfFont,
    pub color: TextColor,
}

impl StyleState {
    /// Initial state for the given point size.
    pub fn new(point_size: u16) -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            superscript: false,
            subscript: false,
            justification: Justification::Left,
            left_margin: 0,
            right_margin: 0,
            point_size,
            font: RtfFont::CourierNew,
            color: TextColor::None,
        }
    }
}
