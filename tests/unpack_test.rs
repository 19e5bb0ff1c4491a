//! Integration tests for cursors and run-length unpacking.

use reformat::decode::{
    peek_u16, unpack_bits, unpack_bytes, ByteCursor, ControlLayout, Endian, ErrorMode,
    RunLengthParams, RunLengthUnpacker,
};
use reformat::Error;

/// Encode with Macintosh PackBits.
fn pack_bits(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < src.len() {
        let mut run = 1;
        while i + run < src.len() && run < 128 && src[i + run] == src[i] {
            run += 1;
        }

        if run >= 2 {
            out.push((1 - run as i16) as i8 as u8);
            out.push(src[i]);
            i += run;
        } else {
            let start = i;
            i += 1;
            while i < src.len() && i - start < 128 && !(i + 1 < src.len() && src[i] == src[i + 1])
            {
                i += 1;
            }
            out.push((i - start - 1) as u8);
            out.extend_from_slice(&src[start..i]);
        }
    }

    out
}

/// A 72-byte MacPaint-style row: white margins around some pattern bytes.
fn paint_row(seed: u8) -> Vec<u8> {
    let mut row = vec![0u8; 72];
    for (i, byte) in row[20..40].iter_mut().enumerate() {
        *byte = seed.wrapping_mul(31).wrapping_add(i as u8 * 7);
    }
    row[50..60].fill(0xff);
    row
}

#[test]
fn test_decodes_packed_samples() {
    let samples: Vec<Vec<u8>> = vec![
        vec![0u8; 300],
        (0..=255u8).collect(),
        paint_row(3),
        b"AAAABCDDDDDDDDDEF".to_vec(),
    ];

    for sample in samples {
        let packed = pack_bits(&sample);
        let mut dst = vec![0u8; sample.len()];
        let n = unpack_bytes(&mut dst, &packed, &RunLengthParams::PACKBITS).unwrap();
        assert_eq!(n, sample.len());
        assert_eq!(dst, sample);
    }
}

#[test]
fn test_row_by_row_streaming() {
    let rows: Vec<Vec<u8>> = (0..4).map(paint_row).collect();
    let packed: Vec<u8> = rows.iter().flat_map(|row| pack_bits(row)).collect();

    let mut cursor = ByteCursor::new(&packed);
    for row in &rows {
        let mut dst = [0u8; 72];
        let n = unpack_bits(&mut cursor, &mut dst, 0).unwrap();
        assert_eq!(n, 72);
        assert_eq!(&dst[..], &row[..]);
    }
    assert!(cursor.is_empty());
}

#[test]
fn test_inverted_rows() {
    let row = paint_row(9);
    let packed = pack_bits(&row);

    let mut dst = [0u8; 72];
    let n = unpack_bits(&mut ByteCursor::new(&packed), &mut dst, 0xff).unwrap();
    assert_eq!(n, 72);
    for (out, original) in dst.iter().zip(&row) {
        assert_eq!(*out, !original);
    }
}

#[test]
fn test_truncated_input_never_panics() {
    let original = paint_row(5);
    let packed = pack_bits(&original);

    for cut in 0..packed.len() {
        let mut dst = vec![0u8; original.len()];
        match unpack_bytes(&mut dst, &packed[..cut], &RunLengthParams::PACKBITS) {
            Ok(n) => {
                assert!(n < original.len());
                assert_eq!(&dst[..n], &original[..n]);
            }
            Err(Error::TruncatedInput { needed, available }) => assert!(available < needed),
            Err(other) => panic!("unexpected error at cut {}: {}", cut, other),
        }
    }
}

#[test]
fn test_small_destination() {
    // Repeated run is cut at capacity
    let mut dst = [0u8; 4];
    let n = unpack_bytes(&mut dst, &[0xf9, 0x55, 0x00, 0x01], &RunLengthParams::PACKBITS).unwrap();
    assert_eq!(n, 4);
    assert_eq!(dst, [0x55; 4]);

    // Literal run does not fit
    let mut dst = [0u8; 4];
    let result = unpack_bytes(&mut dst, &[0x05, 1, 2, 3, 4, 5, 6], &RunLengthParams::PACKBITS);
    assert!(matches!(
        result,
        Err(Error::Overflow {
            needed: 6,
            capacity: 4
        })
    ));
}

#[test]
fn test_huge_bias_saturates() {
    // Signed repeat: the run count saturates and is cut at capacity
    let params = RunLengthParams::new(ControlLayout::Signed, usize::MAX).unwrap();
    let mut dst = [0u8; 16];
    let n = unpack_bytes(&mut dst, &[0xff, 0x41], &params).unwrap();
    assert_eq!(n, 16);
    assert_eq!(dst, [0x41; 16]);

    // Literal of usize::MAX bytes is reported, not allocated
    let result = unpack_bytes(&mut dst, &[0x00, 0x01], &params);
    assert!(matches!(
        result,
        Err(Error::TruncatedInput {
            needed: usize::MAX,
            available: 1
        })
    ));

    // IIgs mode 3 multiplies the saturated count by four
    let params = RunLengthParams::new(ControlLayout::Flagged { count_bits: 6 }, usize::MAX).unwrap();
    let mut dst = [0u8; 10];
    let n = unpack_bytes(&mut dst, &[0xff, 0x22], &params).unwrap();
    assert_eq!(n, 10);
    assert_eq!(dst, [0x22; 10]);

    // IIgs mode 2 repeats the four-byte pattern up to capacity
    let mut dst = [0u8; 6];
    let n = unpack_bytes(&mut dst, &[0xbf, 1, 2, 3, 4], &params).unwrap();
    assert_eq!(n, 6);
    assert_eq!(dst, [1, 2, 3, 4, 1, 2]);
}

#[test]
fn test_iigs_streaming() {
    // Two 8-byte rows: a four-byte pattern twice, then 8 x 0x11
    let src = [0x81, 0xde, 0xad, 0xbe, 0xef, 0xc1, 0x11];
    let unpacker = RunLengthUnpacker::new(RunLengthParams::APPLE_IIGS);
    let mut cursor = ByteCursor::new(&src);

    let mut first = [0u8; 8];
    assert_eq!(unpacker.unpack_from(&mut cursor, &mut first).unwrap(), 8);
    assert_eq!(first, [0xde, 0xad, 0xbe, 0xef, 0xde, 0xad, 0xbe, 0xef]);

    let mut second = [0u8; 8];
    assert_eq!(unpacker.unpack_from(&mut cursor, &mut second).unwrap(), 8);
    assert_eq!(second, [0x11; 8]);
    assert!(cursor.is_empty());
}

#[test]
fn test_header_then_packed_body() {
    // Big-endian width, then a packed body
    let mut file = vec![0x00, 0x08];
    file.extend(pack_bits(&[7, 7, 7, 7, 1, 2, 3, 4]));

    let mut cursor = ByteCursor::new(&file);
    let width = cursor.read_u16(Endian::Big).unwrap() as usize;
    let mut row = vec![0u8; width];
    unpack_bits(&mut cursor, &mut row, 0).unwrap();

    assert_eq!(row, [7, 7, 7, 7, 1, 2, 3, 4]);
    assert_eq!(peek_u16(&file, 0, Endian::Big).unwrap(), 8);
    assert!(matches!(
        peek_u16(&file, file.len() - 1, Endian::Little),
        Err(Error::Underflow { .. })
    ));
}

#[test]
fn test_lenient_cursor_on_short_header() {
    let data = [0x34, 0x12, 0x99];

    let mut strict = ByteCursor::new(&data);
    assert_eq!(strict.read_u16_le().unwrap(), 0x1234);
    assert!(matches!(
        strict.read_u16_le(),
        Err(Error::Underflow {
            needed: 2,
            remaining: 1
        })
    ));
    assert_eq!(strict.position(), 2);

    let mut lenient = ByteCursor::new(&data).with_mode(ErrorMode::Lenient);
    assert_eq!(lenient.read_u16_le().unwrap(), 0x1234);
    assert_eq!(lenient.read_u32_le().unwrap(), u32::MAX);
    assert_eq!(lenient.position(), 2);
    assert_eq!(lenient.read_u8().unwrap(), 0x99);
}
