//! Legacy high-bit character set handling.
//!
//! Two policies live here and are kept separate on purpose, because existing
//! output depends on each of them:
//!
//! - [`to_printable`] folds Apple II "high ASCII" into 7-bit printable text.
//! - [`map_extended`] translates Mac OS Roman (the Apple IIgs character set)
//!   into Windows-1252, which is what the RTF preamble declares.

use once_cell::sync::Lazy;

/// Replacement for bytes that have no Windows-1252 equivalent.
const UNMAPPED: u8 = b'?';

/// Mac OS Roman to Windows-1252, for every byte with the high bit set.
///
/// Glyphs without a Windows-1252 code point get the closest ASCII look-alike
/// where one exists. Missing entries fall back to [`UNMAPPED`].
const MAC_ROMAN_TO_CP1252: &[(u8, u8)] = &[
    (0x80, 0xc4), // A dieresis
    (0x81, 0xc5), // A ring
    (0x82, 0xc7), // C cedilla
    (0x83, 0xc9), // E acute
    (0x84, 0xd1), // N tilde
    (0x85, 0xd6), // O dieresis
    (0x86, 0xdc), // U dieresis
    (0x87, 0xe1), // a acute
    (0x88, 0xe0), // a grave
    (0x89, 0xe2), // a circumflex
    (0x8a, 0xe4), // a dieresis
    (0x8b, 0xe3), // a tilde
    (0x8c, 0xe5), // a ring
    (0x8d, 0xe7), // c cedilla
    (0x8e, 0xe9), // e acute
    (0x8f, 0xe8), // e grave
    (0x90, 0xea), // e circumflex
    (0x91, 0xeb), // e dieresis
    (0x92, 0xed), // i acute
    (0x93, 0xec), // i grave
    (0x94, 0xee), // i circumflex
    (0x95, 0xef), // i dieresis
    (0x96, 0xf1), // n tilde
    (0x97, 0xf3), // o acute
    (0x98, 0xf2), // o grave
    (0x99, 0xf4), // o circumflex
    (0x9a, 0xf6), // o dieresis
    (0x9b, 0xf5), // o tilde
    (0x9c, 0xfa), // u acute
    (0x9d, 0xf9), // u grave
    (0x9e, 0xfb), // u circumflex
    (0x9f, 0xfc), // u dieresis
    (0xa0, 0x86), // dagger
    (0xa1, 0xb0), // degree
    (0xa2, 0xa2), // cent
    (0xa3, 0xa3), // pound
    (0xa4, 0xa7), // section
    (0xa5, 0x95), // bullet
    (0xa6, 0xb6), // pilcrow
    (0xa7, 0xdf), // sharp s
    (0xa8, 0xae), // registered
    (0xa9, 0xa9), // copyright
    (0xaa, 0x99), // trademark
    (0xab, 0xb4), // acute accent
    (0xac, 0xa8), // dieresis
    (0xad, b'#'), // not equal
    (0xae, 0xc6), // AE
    (0xaf, 0xd8), // O slash
    (0xb0, b'8'), // infinity
    (0xb1, 0xb1), // plus-minus
    (0xb2, b'<'), // less-or-equal
    (0xb3, b'>'), // greater-or-equal
    (0xb4, 0xa5), // yen
    (0xb5, 0xb5), // micro
    (0xb6, b'd'), // partial differential
    (0xb7, b'E'), // summation
    (0xb8, b'P'), // product
    (0xb9, b'p'), // pi
    (0xba, b'S'), // integral
    (0xbb, 0xaa), // feminine ordinal
    (0xbc, 0xba), // masculine ordinal
    (0xbd, b'O'), // omega
    (0xbe, 0xe6), // ae
    (0xbf, 0xf8), // o slash
    (0xc0, 0xbf), // inverted question
    (0xc1, 0xa1), // inverted exclamation
    (0xc2, 0xac), // not
    (0xc3, b'v'), // square root
    (0xc4, 0x83), // florin
    (0xc5, b'~'), // almost equal
    (0xc6, b'D'), // increment
    (0xc7, 0xab), // left guillemet
    (0xc8, 0xbb), // right guillemet
    (0xc9, 0x85), // ellipsis
    (0xca, 0xa0), // no-break space
    (0xcb, 0xc0), // A grave
    (0xcc, 0xc3), // A tilde
    (0xcd, 0xd5), // O tilde
    (0xce, 0x8c), // OE
    (0xcf, 0x9c), // oe
    (0xd0, 0x96), // en dash
    (0xd1, 0x97), // em dash
    (0xd2, 0x93), // left double quote
    (0xd3, 0x94), // right double quote
    (0xd4, 0x91), // left single quote
    (0xd5, 0x92), // right single quote
    (0xd6, 0xf7), // division
    (0xd7, b'o'), // lozenge
    (0xd8, 0xff), // y dieresis
    (0xd9, 0x9f), // Y dieresis
    (0xda, b'/'), // fraction slash
    (0xdb, 0xa4), // currency
    (0xdc, 0x8b), // single left guillemet
    (0xdd, 0x9b), // single right guillemet
    (0xe0, 0x87), // double dagger
    (0xe1, 0xb7), // middle dot
    (0xe2, 0x82), // low single quote
    (0xe3, 0x84), // low double quote
    (0xe4, 0x89), // per mille
    (0xe5, 0xc2), // A circumflex
    (0xe6, 0xca), // E circumflex
    (0xe7, 0xc1), // A acute
    (0xe8, 0xcb), // E dieresis
    (0xe9, 0xc8), // E grave
    (0xea, 0xcd), // I acute
    (0xeb, 0xce), // I circumflex
    (0xec, 0xcf), // I dieresis
    (0xed, 0xcc), // I grave
    (0xee, 0xd3), // O acute
    (0xef, 0xd4), // O circumflex
    (0xf1, 0xd2), // O grave
    (0xf2, 0xda), // U acute
    (0xf3, 0xdb), // U circumflex
    (0xf4, 0xd9), // U grave
    (0xf5, b'i'), // dotless i
    (0xf6, 0x88), // circumflex accent
    (0xf7, 0x98), // small tilde
    (0xf8, 0xaf), // macron
    (0xfc, 0xb8), // cedilla
];

/// Translation table for bytes `0x80..=0xff`, indexed by `byte - 0x80`.
///
/// Built on first use and read-only afterwards.
pub static CHARACTER_MAP: Lazy<[u8; 128]> = Lazy::new(|| {
    let mut table = [UNMAPPED; 128];
    for &(from, to) in MAC_ROMAN_TO_CP1252 {
        table[(from - 0x80) as usize] = to;
    }
    table
});

/// Fold a byte into 7-bit printable ASCII.
///
/// Control characters, DEL, the C1 range and `0xff` become `.`; high-ASCII
/// letters `0xa0..=0xfe` lose their high bit.
pub fn to_printable(byte: u8) -> u8 {
    match byte {
        0x20..=0x7e => byte,
        0xa0..=0xfe => byte & 0x7f,
        _ => b'.',
    }
}

/// Translate an Apple IIgs (Mac OS Roman) byte into Windows-1252.
///
/// Bytes below 128 pass through unchanged.
pub fn map_extended(byte: u8) -> u8 {
    if byte < 0x80 {
        byte
    } else {
        CHARACTER_MAP[(byte - 0x80) as usize]
    }
}

/// Check if a byte is ordinary text once its high bit is stripped.
pub(crate) fn is_text_like(byte: u8) -> bool {
    matches!(byte & 0x7f, 0x20..=0x7e | b'\t' | b'\r' | b'\n' | 0x0c)
}
