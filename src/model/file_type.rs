//! Legacy ProDOS file type codes.

use serde::Serialize;
use std::fmt;

/// File type code identifying the semantic format of a legacy file.
///
/// Only the codes the reformatters care about are named; everything else is
/// carried as [`FileTypeTag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileTypeTag {
    /// Pascal code
    Pcd,
    /// Pascal text
    Ptx,
    /// ASCII text
    Txt,
    /// Binary
    Bin,
    /// Apple II graphics (hi-res / double hi-res)
    Fot,
    /// Business BASIC program
    Ba3,
    /// Directory
    Dir,
    /// AppleWorks data base
    Adb,
    /// AppleWorks word processor
    Awp,
    /// AppleWorks spreadsheet
    Asp,
    /// Apple II source code
    Ob8,
    /// ProDOS 8 code
    P8c,
    /// Apple IIgs word processor
    Gwp,
    /// Apple IIgs object
    Obj,
    /// Apple IIgs library
    Lib,
    /// Apple IIgs file system translator
    Fst,
    /// Apple IIgs packed super hi-res
    Pnt,
    /// Apple IIgs super hi-res picture
    Pic,
    /// ProDOS command
    Cmd,
    /// DOS 3.3 alternate 'B' file
    DosB,
    /// Apple IIgs system file
    Os,
    /// Integer BASIC program
    Int,
    /// Applesoft BASIC program
    Bas,
    /// ProDOS system file
    Sys,
    /// Any code without a named variant
    Other(u8),
}

impl FileTypeTag {
    /// Every named file type, in code order.
    pub const NAMED: [FileTypeTag; 24] = [
        FileTypeTag::Pcd,
        FileTypeTag::Ptx,
        FileTypeTag::Txt,
        FileTypeTag::Bin,
        FileTypeTag::Fot,
        FileTypeTag::Ba3,
        FileTypeTag::Dir,
        FileTypeTag::Adb,
        FileTypeTag::Awp,
        FileTypeTag::Asp,
        FileTypeTag::Ob8,
        FileTypeTag::P8c,
        FileTypeTag::Gwp,
        FileTypeTag::Obj,
        FileTypeTag::Lib,
        FileTypeTag::Fst,
        FileTypeTag::Pnt,
        FileTypeTag::Pic,
        FileTypeTag::Cmd,
        FileTypeTag::DosB,
        FileTypeTag::Os,
        FileTypeTag::Int,
        FileTypeTag::Bas,
        FileTypeTag::Sys,
    ];

    /// Map a raw type code to a tag.
    pub fn from_code(code: u8) -> Self {
        Self::NAMED
            .iter()
            .copied()
            .find(|tag| tag.code() == code)
            .unwrap_or(FileTypeTag::Other(code))
    }

    /// The raw type code.
    pub fn code(self) -> u8 {
        match self {
            FileTypeTag::Pcd => 0x02,
            FileTypeTag::Ptx => 0x03,
            FileTypeTag::Txt => 0x04,
            FileTypeTag::Bin => 0x06,
            FileTypeTag::Fot => 0x08,
            FileTypeTag::Ba3 => 0x09,
            FileTypeTag::Dir => 0x0f,
            FileTypeTag::Adb => 0x19,
            FileTypeTag::Awp => 0x1a,
            FileTypeTag::Asp => 0x1b,
            FileTypeTag::Ob8 => 0x2b,
            FileTypeTag::P8c => 0x2e,
            FileTypeTag::Gwp => 0x50,
            FileTypeTag::Obj => 0xb1,
            FileTypeTag::Lib => 0xb2,
            FileTypeTag::Fst => 0xbd,
            FileTypeTag::Pnt => 0xc0,
            FileTypeTag::Pic => 0xc1,
            FileTypeTag::Cmd => 0xf0,
            FileTypeTag::DosB => 0xf4,
            FileTypeTag::Os => 0xf9,
            FileTypeTag::Int => 0xfa,
            FileTypeTag::Bas => 0xfc,
            FileTypeTag::Sys => 0xff,
            FileTypeTag::Other(code) => code,
        }
    }

    /// Three-letter abbreviation as shown in catalogs, or `$XX` for unnamed codes.
    pub fn abbreviation(self) -> String {
        let name = match self {
            FileTypeTag::Pcd => "PCD",
            FileTypeTag::Ptx => "PTX",
            FileTypeTag::Txt => "TXT",
            FileTypeTag::Bin => "BIN",
            FileTypeTag::Fot => "FOT",
            FileTypeTag::Ba3 => "BA3",
            FileTypeTag::Dir => "DIR",
            FileTypeTag::Adb => "ADB",
            FileTypeTag::Awp => "AWP",
            FileTypeTag::Asp => "ASP",
            FileTypeTag::Ob8 => "8OB",
            FileTypeTag::P8c => "P8C",
            FileTypeTag::Gwp => "GWP",
            FileTypeTag::Obj => "OBJ",
            FileTypeTag::Lib => "LIB",
            FileTypeTag::Fst => "FST",
            FileTypeTag::Pnt => "PNT",
            FileTypeTag::Pic => "PIC",
            FileTypeTag::Cmd => "CMD",
            FileTypeTag::DosB => "B",
            FileTypeTag::Os => "OS",
            FileTypeTag::Int => "INT",
            FileTypeTag::Bas => "BAS",
            FileTypeTag::Sys => "SYS",
            FileTypeTag::Other(code) => return format!("${:02X}", code),
        };
        name.to_string()
    }

    /// Parse an abbreviation (case-insensitive) or a `$XX` / `0xXX` code.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let hex = text
            .strip_prefix('$')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"));
        if let Some(hex) = hex {
            return u8::from_str_radix(hex, 16).ok().map(Self::from_code);
        }
        Self::NAMED
            .iter()
            .copied()
            .find(|tag| tag.abbreviation().eq_ignore_ascii_case(text))
    }

    /// Check if files of this type hold plain text.
    pub fn is_text(self) -> bool {
        matches!(self, FileTypeTag::Txt | FileTypeTag::Ptx)
    }
}

impl From<u8> for FileTypeTag {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for FileTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviation())
    }
}
