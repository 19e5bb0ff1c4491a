//! Low-level binary decoding: bounds-checked cursors and run-length unpacking.

mod cursor;
mod options;
mod packbits;

pub use cursor::{peek_u16, peek_u32, ByteCursor, Endian};
pub use options::ErrorMode;
pub use packbits::{unpack_bits, unpack_bytes, ControlLayout, RunLengthParams, RunLengthUnpacker};
