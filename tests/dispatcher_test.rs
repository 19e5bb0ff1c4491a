//! Integration tests for the converter dispatcher.

use std::sync::Arc;

use reformat::convert::{
    ConvertOptions, Converter, DocumentConverter, GraphicsConverter, ReformatDispatcher,
};
use reformat::decode::{unpack_bits, Endian};
use reformat::error::{Error, Result};
use reformat::model::{
    Applicability, BitmapImage, ConversionTarget, FileTypeTag, PaletteColor, PartKind,
    ReformatHolder, StyledDocument, APPLE_II_PALETTE,
};
use reformat::render::{BeginFlags, StyledWriter};

/// Monochrome bitmap: big-endian row bytes and height, then PackBits rows.
struct PackedMonoConverter;

impl GraphicsConverter for PackedMonoConverter {
    fn name(&self) -> &str {
        "packed-mono"
    }

    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability {
        match holder.part(part) {
            Some(data)
                if part == PartKind::Data
                    && holder.file_type() == FileTypeTag::Pnt
                    && data.len() >= 4 =>
            {
                Applicability::Yes
            }
            _ => Applicability::Not,
        }
    }

    fn process(
        &self,
        holder: &ReformatHolder<'_>,
        part: PartKind,
        options: &ConvertOptions,
    ) -> Result<BitmapImage> {
        let data = holder.part(part).unwrap_or_default();
        let mut cursor = options.cursor(data);
        let row_bytes = cursor.read_u16(Endian::Big)?;
        let height = cursor.read_u16(Endian::Big)?;

        let palette = vec![PaletteColor::White.entry(), PaletteColor::Black.entry()];
        let mut bitmap = BitmapImage::new(u32::from(row_bytes) * 8, u32::from(height), 1)?
            .with_custom_palette(palette);
        for y in 0..u32::from(height) {
            let row = bitmap.row_mut(y);
            let n = unpack_bits(&mut cursor, row, 0)?;
            if n < row.len() {
                return Err(Error::Other(format!("row {} is short", y)));
            }
        }
        Ok(bitmap)
    }
}

/// Paints the 16 palette colors in a row, for any picture file.
struct ColorBarsConverter;

impl GraphicsConverter for ColorBarsConverter {
    fn name(&self) -> &str {
        "color-bars"
    }

    fn examine(&self, holder: &ReformatHolder<'_>, part: PartKind) -> Applicability {
        if part == PartKind::Data && holder.file_type() == FileTypeTag::Pnt {
            Applicability::ProbablyNot
        } else {
            Applicability::Not
        }
    }

    fn process(
        &self,
        _holder: &ReformatHolder<'_>,
        _part: PartKind,
        _options: &ConvertOptions,
    ) -> Result<BitmapImage> {
        let mut bitmap = BitmapImage::new(16, 1, 4)?.with_palette(&APPLE_II_PALETTE);
        for x in 0..16u8 {
            bitmap.set_index(u32::from(x), 0, x)?;
        }
        Ok(bitmap)
    }
}

/// Writes before opening its document.
struct SloppyConverter;

impl DocumentConverter for SloppyConverter {
    fn name(&self) -> &str {
        "sloppy"
    }

    fn examine(&self, _holder: &ReformatHolder<'_>, _part: PartKind) -> Applicability {
        Applicability::Yes
    }

    fn process(
        &self,
        _holder: &ReformatHolder<'_>,
        _part: PartKind,
        _options: &ConvertOptions,
    ) -> Result<StyledDocument> {
        let mut writer = StyledWriter::rtf();
        writer.write_text(b"too early")?;
        writer.begin(BeginFlags::NONE)?;
        writer.end()?;
        writer.finish()
    }
}

fn paint_dispatcher() -> ReformatDispatcher {
    let mut dispatcher = ReformatDispatcher::with_defaults();
    dispatcher.register_graphics(Arc::new(PackedMonoConverter));
    dispatcher.register_graphics(Arc::new(ColorBarsConverter));
    dispatcher
}

// One byte per row, two rows: 0xaa then 0x55
const MONO_PICTURE: [u8; 8] = [0x00, 0x01, 0x00, 0x02, 0x00, 0xaa, 0x00, 0x55];

#[test]
fn test_examine_ranks_best_first() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE);
    dispatcher.examine(&mut holder);

    assert!(holder.is_examined());
    assert_eq!(
        holder.applicable(PartKind::Data),
        vec![
            ("packed-mono", Applicability::Yes),
            ("color-bars", Applicability::ProbablyNot),
            ("hex-dump", Applicability::Always),
        ]
    );
    assert_eq!(
        holder.applicability("text", PartKind::Data),
        Some(Applicability::Not)
    );
}

#[test]
fn test_process_graphics() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE);
    dispatcher.examine(&mut holder);

    let target = dispatcher
        .process_best(&holder, PartKind::Data, &ConvertOptions::default())
        .unwrap();
    let bitmap = target.as_bitmap().unwrap();

    assert_eq!((bitmap.width, bitmap.height, bitmap.depth), (8, 2, 1));
    assert_eq!(bitmap.index_at(0, 0), Some(1));
    assert_eq!(bitmap.index_at(1, 0), Some(0));
    assert_eq!(bitmap.index_at(0, 1), Some(0));
    assert_eq!(bitmap.index_at(1, 1), Some(1));
    assert_eq!(target.extension(), "bmp");
    assert_eq!(&target.to_bytes().unwrap()[..2], b"BM");
}

#[test]
fn test_process_lower_ranked_converter() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE);
    dispatcher.examine(&mut holder);

    let target = dispatcher
        .process(&holder, "color-bars", PartKind::Data, &ConvertOptions::default())
        .unwrap();
    let bitmap = target.as_bitmap().unwrap();
    assert_eq!(bitmap.index_at(9, 0), Some(PaletteColor::Orange.index()));
    assert_eq!(bitmap.palette.as_deref(), Some(&APPLE_II_PALETTE[..]));
}

#[test]
fn test_truncated_picture_is_wrapped() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE[..5]);
    dispatcher.examine(&mut holder);

    let err = dispatcher
        .process(&holder, "packed-mono", PartKind::Data, &ConvertOptions::default())
        .unwrap_err();
    match err {
        Error::Conversion { converter, source } => {
            assert_eq!(converter, "packed-mono");
            assert!(matches!(*source, Error::TruncatedInput { .. }));
        }
        other => panic!("expected conversion error, got {}", other),
    }
}

#[test]
fn test_empty_picture_is_wrapped() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &[0x00, 0x01, 0x00, 0x00]);
    dispatcher.examine(&mut holder);

    let err = dispatcher
        .process(&holder, "packed-mono", PartKind::Data, &ConvertOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("packed-mono"));
    assert!(matches!(
        err,
        Error::Conversion { ref source, .. } if matches!(**source, Error::InvalidArgument(_))
    ));
}

#[test]
fn test_sequence_error_is_not_wrapped() {
    let mut dispatcher = ReformatDispatcher::new();
    dispatcher.register_document(Arc::new(SloppyConverter));
    let mut holder = ReformatHolder::with_data(FileTypeTag::Txt, b"hi");
    dispatcher.examine(&mut holder);

    let result = dispatcher.process(&holder, "sloppy", PartKind::Data, &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Sequence("write before begin"))));
}

#[test]
fn test_reexamine_discards_old_results() {
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE);
    paint_dispatcher().examine(&mut holder);
    assert!(holder.applicability("packed-mono", PartKind::Data).is_some());

    let defaults = ReformatDispatcher::with_defaults();
    defaults.examine(&mut holder);
    assert!(holder.applicability("packed-mono", PartKind::Data).is_none());

    let result = defaults.process(&holder, "text", PartKind::Data, &ConvertOptions::default());
    assert!(matches!(result, Err(Error::NotApplicable { .. })));
}

#[test]
fn test_missing_part_is_not_applicable() {
    let dispatcher = paint_dispatcher();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Pnt, &MONO_PICTURE);
    dispatcher.examine(&mut holder);

    let result = dispatcher.process(
        &holder,
        "hex-dump",
        PartKind::Resource,
        &ConvertOptions::default(),
    );
    assert!(matches!(result, Err(Error::NotApplicable { .. })));
}

#[test]
fn test_comment_part() {
    let dispatcher = ReformatDispatcher::with_defaults();
    let mut holder = ReformatHolder::with_data(FileTypeTag::Bin, &[0x00, 0x01])
        .with_name("GAME")
        .with_part(PartKind::Comment, b"Saved game\r");
    dispatcher.examine(&mut holder);

    assert_eq!(
        holder.applicable(PartKind::Comment)[0],
        ("text", Applicability::Yes)
    );

    let options = ConvertOptions::new().with_rtf(false);
    let target = dispatcher
        .process_best(&holder, PartKind::Comment, &options)
        .unwrap();
    assert!(matches!(target, ConversionTarget::Document(_)));
    assert_eq!(target.to_bytes().unwrap(), b"Saved game\r\n");
}

#[test]
fn test_converter_enum() {
    let dispatcher = paint_dispatcher();
    assert_eq!(
        dispatcher.names(),
        vec!["text", "hex-dump", "packed-mono", "color-bars"]
    );

    let converter = dispatcher.get_by_name("Packed-Mono").unwrap();
    assert!(converter.is_graphics());
    assert_eq!(format!("{:?}", converter), "Graphics(\"packed-mono\")");

    let text: &Converter = dispatcher.get_by_name("text").unwrap();
    assert!(!text.is_graphics());
}
