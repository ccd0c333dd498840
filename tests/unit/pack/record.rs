use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "respack_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn split_produces_ceil_sections_within_ceiling() {
    for (len, ceiling) in [(0usize, 4usize), (1, 4), (4, 4), (5, 4), (17, 4), (100, 1), (10, 100)] {
        let sections = split_sections(len, ceiling);
        assert_eq!(sections.len(), len.div_ceil(ceiling), "len={len} ceiling={ceiling}");
        assert!(sections.iter().all(|r| r.len() <= ceiling && !r.is_empty()));
        let covered: usize = sections.iter().map(|r| r.len()).sum();
        assert_eq!(covered, len);
        assert!(sections.windows(2).all(|w| w[0].end == w[1].start));
    }
}

#[test]
fn identifiers_are_c_safe() {
    assert_eq!(sanitize_identifier("logo"), "logo");
    assert_eq!(sanitize_identifier("my-icon.v2"), "my_icon_v2");
    assert_eq!(sanitize_identifier("16x16"), "_16x16");
    assert_eq!(sanitize_identifier(""), "resource");
    assert_eq!(default_name(Path::new("dir/tool bar.png")), "tool_bar");
}

#[test]
fn section_names_single_and_split() {
    assert_eq!(section_names("a", 1), vec!["a_data"]);
    assert_eq!(section_names("a", 3), vec!["a_data_0", "a_data_1", "a_data_2"]);
    assert!(section_names("a", 0).is_empty());
}

#[test]
fn file_content_detection() {
    assert_eq!(FileContent::detect(b"hello\n"), FileContent::Text);
    assert_eq!(FileContent::detect(b"a\0b"), FileContent::Binary);
    assert_eq!(FileContent::detect(&[0xff, 0xfe]), FileContent::Binary);
}

#[test]
fn png_input_becomes_image_record() {
    let dir = temp_dir("record_png");
    let path = dir.join("dot.png");
    let img = image::RgbaImage::from_raw(1, 1, vec![1u8, 2, 3, 4]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, &buf).unwrap();

    let rec = build_record("dot", &path, &PackOptions::default()).unwrap();
    assert_eq!(
        rec.kind,
        ResourceKind::Image {
            width: 1,
            height: 1,
            channels: 4
        }
    );
    assert_eq!(rec.reassemble(), vec![1, 2, 3, 4]);
    assert_eq!(rec.to_embedded().decode().unwrap(), vec![1, 2, 3, 4]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn non_png_falls_back_to_file_record() {
    let dir = temp_dir("record_file");
    let path = dir.join("notes.txt");
    std::fs::write(&path, b"not an image at all").unwrap();

    let opts = PackOptions {
        encode: true,
        section_ceiling: 8,
        ..PackOptions::default()
    };
    let rec = build_record("notes", &path, &opts).unwrap();
    assert_eq!(
        rec.kind,
        ResourceKind::File {
            content: FileContent::Text
        }
    );
    assert!(rec.sections.len() > 1);
    assert_eq!(rec.reassemble(), rec.blob.bytes);
    assert_eq!(rec.section_bytes(0).unwrap().len(), 8);
    assert!(rec.section_bytes(rec.sections.len()).is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_io_error() {
    let err = build_record("x", Path::new("no/such/file.bin"), &PackOptions::default()).unwrap_err();
    assert!(matches!(err, RespackError::Io { .. }));
}

#[test]
fn corrupt_png_is_packed_as_file() {
    let dir = temp_dir("record_corrupt");
    let path = dir.join("broken.png");
    let mut bytes = crate::assets::PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(b"garbage after the signature");
    std::fs::write(&path, &bytes).unwrap();

    let rec = build_record("broken", &path, &PackOptions::default()).unwrap();
    assert_eq!(
        rec.kind,
        ResourceKind::File {
            content: FileContent::Binary
        }
    );
    assert_eq!(rec.reassemble(), bytes);

    std::fs::remove_dir_all(&dir).ok();
}
