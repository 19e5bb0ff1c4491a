//! Run-length ("PackBits" family) decoding.
//!
//! Every format in this family interleaves control bytes with data. A control
//! byte either introduces a LITERAL run (copy the next N source bytes) or a
//! REPEATED run (replicate a short pattern N times). How N and the run kind
//! are packed into the control byte differs per format, so the layout and
//! the count bias are parameters rather than constants.
//!
//! Overflow policy:
//!
//! - A REPEATED run longer than the space left in the destination is cut at
//!   capacity and decoding stops with `Ok(capacity)`. Damaged images then
//!   still yield a partial bitmap.
//! - A LITERAL run longer than the space left fails with [`Error::Overflow`]
//!   and writes nothing for that run.
//! - A run whose data bytes are missing from the source fails with
//!   [`Error::TruncatedInput`].

use super::ByteCursor;
use crate::error::{Error, Result};

/// How a control byte encodes the run kind and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLayout {
    /// Two's complement count (Macintosh PackBits).
    ///
    /// `0..=127` is a literal of `n + bias` bytes, `-127..=-1` repeats the
    /// next byte `-n + bias` times, and `-128` is a no-op.
    Signed,
    /// Mode in the high bits, count in the low `count_bits` bits (Apple IIgs
    /// `UnPackBytes`).
    ///
    /// Mode 0 is a literal, mode 1 repeats one byte, mode 2 repeats a
    /// four-byte pattern, mode 3 repeats one byte four times the count.
    /// With seven count bits only modes 0 and 1 exist.
    Flagged { count_bits: u8 },
}

/// Parameters for one run-length format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLengthParams {
    layout: ControlLayout,
    bias: usize,
}

impl RunLengthParams {
    /// Macintosh PackBits, as used by MacPaint and PICT.
    pub const PACKBITS: Self = Self {
        layout: ControlLayout::Signed,
        bias: 1,
    };

    /// Apple IIgs toolbox `UnPackBytes`, as used by packed super hi-res files.
    pub const APPLE_IIGS: Self = Self {
        layout: ControlLayout::Flagged { count_bits: 6 },
        bias: 1,
    };

    /// Create parameters for a custom layout.
    ///
    /// Flagged layouts must use 6 or 7 count bits so the mode fits in the
    /// remaining high bits.
    pub fn new(layout: ControlLayout, bias: usize) -> Result<Self> {
        if let ControlLayout::Flagged { count_bits } = layout {
            if !(6..=7).contains(&count_bits) {
                return Err(Error::InvalidArgument(format!(
                    "flagged run-length layout needs 6 or 7 count bits, got {}",
                    count_bits
                )));
            }
        }
        Ok(Self { layout, bias })
    }

    /// The control byte layout.
    pub fn layout(&self) -> ControlLayout {
        self.layout
    }

    /// The value added to the raw count field.
    pub fn bias(&self) -> usize {
        self.bias
    }

    fn decode_control(&self, control: u8) -> Run {
        match self.layout {
            ControlLayout::Signed => {
                let n = control as i8;
                if n >= 0 {
                    Run::Literal((n as usize).saturating_add(self.bias))
                } else if n == i8::MIN {
                    Run::Skip
                } else {
                    Run::Repeat {
                        pattern: 1,
                        times: (n.unsigned_abs() as usize).saturating_add(self.bias),
                    }
                }
            }
            ControlLayout::Flagged { count_bits } => {
                let count = (control & ((1u8 << count_bits) - 1)) as usize;
                let count = count.saturating_add(self.bias);
                match control >> count_bits {
                    0 => Run::Literal(count),
                    1 => Run::Repeat {
                        pattern: 1,
                        times: count,
                    },
                    2 => Run::Repeat {
                        pattern: 4,
                        times: count,
                    },
                    _ => Run::Repeat {
                        pattern: 1,
                        times: count.saturating_mul(4),
                    },
                }
            }
        }
    }
}

impl Default for RunLengthParams {
    fn default() -> Self {
        Self::PACKBITS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Literal(usize),
    Repeat { pattern: usize, times: usize },
    Skip,
}

/// Run-length decoder for one format, with an optional XOR mask.
///
/// The unpacker holds no reference to any bitmap or document; it is a pure
/// function of its source bytes and destination capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLengthUnpacker {
    params: RunLengthParams,
    xor_mask: u8,
}

impl RunLengthUnpacker {
    /// Create an unpacker for the given format.
    pub fn new(params: RunLengthParams) -> Self {
        Self {
            params,
            xor_mask: 0,
        }
    }

    /// XOR every decoded byte with `mask` before writing it.
    ///
    /// Inverted monochrome formats use `0xff`.
    pub fn with_xor(mut self, mask: u8) -> Self {
        self.xor_mask = mask;
        self
    }

    /// The format parameters.
    pub fn params(&self) -> &RunLengthParams {
        &self.params
    }

    /// Decode all of `src` into `dst`, returning the number of bytes written.
    ///
    /// Decoding stops when the source is exhausted, or early when a repeated
    /// run reaches the destination capacity.
    pub fn unpack(&self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let mut cursor = ByteCursor::new(src);
        let mut written = 0;

        while !cursor.is_empty() {
            let control = cursor.read_u8()?;
            let run = self.params.decode_control(control);
            if self.write_run(run, &mut cursor, dst, &mut written)? {
                break;
            }
        }

        Ok(written)
    }

    /// Decode from a streaming cursor until `dst` is full.
    ///
    /// The cursor is left just past the last consumed run, so callers can
    /// decode row by row out of a buffer that interleaves other fields. If
    /// the source runs out on a run boundary before `dst` is full, the
    /// number of bytes written so far is returned.
    pub fn unpack_from(&self, src: &mut ByteCursor<'_>, dst: &mut [u8]) -> Result<usize> {
        let mut written = 0;

        while written < dst.len() {
            if src.is_empty() {
                log::debug!(
                    "run-length source exhausted after {} of {} bytes",
                    written,
                    dst.len()
                );
                break;
            }
            let control = src.read_u8()?;
            let run = self.params.decode_control(control);
            if self.write_run(run, src, dst, &mut written)? {
                break;
            }
        }

        Ok(written)
    }

    /// Write one run. Returns `true` when a repeated run was cut at capacity.
    fn write_run(
        &self,
        run: Run,
        src: &mut ByteCursor<'_>,
        dst: &mut [u8],
        written: &mut usize,
    ) -> Result<bool> {
        let capacity = dst.len();

        match run {
            Run::Skip => Ok(false),
            Run::Literal(len) => {
                if src.remaining() < len {
                    return Err(Error::TruncatedInput {
                        needed: len,
                        available: src.remaining(),
                    });
                }
                let end = written.saturating_add(len);
                if end > capacity {
                    return Err(Error::Overflow {
                        needed: end,
                        capacity,
                    });
                }
                let bytes = src.read_bytes(len)?;
                for (out, byte) in dst[*written..end].iter_mut().zip(bytes) {
                    *out = byte ^ self.xor_mask;
                }
                *written = end;
                Ok(false)
            }
            Run::Repeat { pattern, times } => {
                if src.remaining() < pattern {
                    return Err(Error::TruncatedInput {
                        needed: pattern,
                        available: src.remaining(),
                    });
                }
                let bytes = src.read_bytes(pattern)?;
                let total = pattern.saturating_mul(times);
                let room = capacity - *written;
                let len = total.min(room);
                for (out, byte) in dst[*written..*written + len]
                    .iter_mut()
                    .zip(bytes.iter().cycle())
                {
                    *out = byte ^ self.xor_mask;
                }
                *written += len;

                if total > room {
                    log::debug!(
                        "repeated run of {} bytes truncated at capacity {}",
                        total,
                        capacity
                    );
                    return Ok(true);
                }
                Ok(false)
            }
        }
    }
}

/// Decode a whole run-length buffer into `dst`.
///
/// See the module documentation for the overflow policy.
pub fn unpack_bytes(dst: &mut [u8], src: &[u8], params: &RunLengthParams) -> Result<usize> {
    RunLengthUnpacker::new(*params).unpack(dst, src)
}

/// Decode Macintosh PackBits from a streaming cursor until `dst` is full,
/// XOR-ing each byte with `xor_mask`.
pub fn unpack_bits(src: &mut ByteCursor<'_>, dst: &mut [u8], xor_mask: u8) -> Result<usize> {
    RunLengthUnpacker::new(RunLengthParams::PACKBITS)
        .with_xor(xor_mask)
        .unpack_from(src, dst)
}
