//! Bounds-checked sequential reader over a borrowed byte buffer.

use super::ErrorMode;
use crate::error::{Error, Result};

/// Byte order for multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Least significant byte first (6502, 65816)
    #[default]
    Little,
    /// Most significant byte first (68000, file headers)
    Big,
}

/// Sequential reader that never reads past its declared length.
///
/// Every read either consumes exactly the requested number of bytes or
/// fails without consuming anything. In [`ErrorMode::Lenient`] a failed
/// read returns the all-ones sentinel instead (`0xff`, `0xffff`,
/// `0xffffffff`) so that converters written against the old best-effort
/// behavior keep producing output for damaged files.
///
/// # Example
///
/// ```
/// use reformat::decode::ByteCursor;
///
/// let mut cursor = ByteCursor::new(&[0x34, 0x12, 0x7f]);
/// assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
/// assert_eq!(cursor.read_u8().unwrap(), 0x7f);
/// assert!(cursor.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    mode: ErrorMode,
}

impl<'a> ByteCursor<'a> {
    /// Create a strict cursor over the whole buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            mode: ErrorMode::Strict,
        }
    }

    /// Create a cursor over the first `len` bytes of the buffer.
    ///
    /// `len` is clamped to the buffer length.
    pub fn with_len(buf: &'a [u8], len: usize) -> Self {
        Self::new(&buf[..len.min(buf.len())])
    }

    /// Set the error handling mode.
    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    /// The error handling mode in effect.
    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Offset of the next byte from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread part of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        match self.take::<1>() {
            Ok(bytes) => Ok(bytes[0]),
            Err(err) => self.sentinel(err, u8::MAX),
        }
    }

    /// Read a little-endian 16-bit value.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_u16(Endian::Little)
    }

    /// Read a big-endian 16-bit value.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.read_u16(Endian::Big)
    }

    /// Read a little-endian 32-bit value.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_u32(Endian::Little)
    }

    /// Read a big-endian 32-bit value.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_u32(Endian::Big)
    }

    /// Read a 16-bit value in the given byte order.
    pub fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        match self.take::<2>() {
            Ok(bytes) => Ok(match endian {
                Endian::Little => u16::from_le_bytes(bytes),
                Endian::Big => u16::from_be_bytes(bytes),
            }),
            Err(err) => self.sentinel(err, u16::MAX),
        }
    }

    /// Read a 32-bit value in the given byte order.
    pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        match self.take::<4>() {
            Ok(bytes) => Ok(match endian {
                Endian::Little => u32::from_le_bytes(bytes),
                Endian::Big => u32::from_be_bytes(bytes),
            }),
            Err(err) => self.sentinel(err, u32::MAX),
        }
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// Always strict: there is no meaningful sentinel for a slice.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.check(len)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Skip `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    fn check(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::Underflow { needed, remaining });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    fn sentinel<T>(&self, err: Error, value: T) -> Result<T> {
        if self.mode.is_lenient() {
            log::warn!("{} at offset {}, substituting sentinel", err, self.pos);
            Ok(value)
        } else {
            Err(err)
        }
    }
}

/// Read a 16-bit value at an arbitrary address without consuming anything.
pub fn peek_u16(buf: &[u8], address: usize, endian: Endian) -> Result<u16> {
    let bytes = peek::<2>(buf, address)?;
    Ok(match endian {
        Endian::Little => u16::from_le_bytes(bytes),
        Endian::Big => u16::from_be_bytes(bytes),
    })
}

/// Read a 32-bit value at an arbitrary address without consuming anything.
pub fn peek_u32(buf: &[u8], address: usize, endian: Endian) -> Result<u32> {
    let bytes = peek::<4>(buf, address)?;
    Ok(match endian {
        Endian::Little => u32::from_le_bytes(bytes),
        Endian::Big => u32::from_be_bytes(bytes),
    })
}

fn peek<const N: usize>(buf: &[u8], address: usize) -> Result<[u8; N]> {
    let end = address.checked_add(N).filter(|end| *end <= buf.len());
    match end {
        Some(end) => {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(&buf[address..end]);
            Ok(bytes)
        }
        None => Err(Error::Underflow {
            needed: N,
            remaining: buf.len().saturating_sub(address),
        }),
    }
}
