use super::*;
use crate::{
    codec::pack,
    pack::record::{FileContent, split_sections},
};

fn record(name: &str, kind: ResourceKind, raw: &[u8], opts: &PackOptions) -> ResourceRecord {
    let blob = pack(raw, opts.compress, opts.encode).unwrap();
    let sections = split_sections(blob.len(), opts.section_ceiling);
    ResourceRecord {
        name: name.to_string(),
        source: name.into(),
        kind,
        blob,
        sections,
    }
}

#[test]
fn raw_file_is_a_single_byte_list() {
    let opts = PackOptions::default();
    let rec = record(
        "blob",
        ResourceKind::File {
            content: FileContent::Binary,
        },
        &[0, 1, 255],
        &opts,
    );
    let text = emit_record(&rec);
    assert_eq!(
        text,
        "/* blob: binary file; raw */\n\
         static const unsigned int blob_length = 3;\n\
         static const unsigned char blob_data[] = {\n    0x00, 0x01, 0xff,\n};\n"
    );
}

#[test]
fn image_constants_and_raw_length_when_transformed() {
    let opts = PackOptions {
        compress: true,
        encode: true,
        ..PackOptions::default()
    };
    let rec = record(
        "px",
        ResourceKind::Image {
            width: 2,
            height: 2,
            channels: 4,
        },
        &[7u8; 16],
        &opts,
    );
    let text = emit_record(&rec);
    assert!(text.starts_with("/* px: image 2x2, 4 channels; zlib+base64 */\n"));
    assert!(text.contains("static const unsigned int px_width = 2;\n"));
    assert!(text.contains("static const unsigned int px_height = 2;\n"));
    assert!(text.contains("static const unsigned int px_channels = 4;\n"));
    assert!(text.contains("static const unsigned int px_raw_length = 16;\n"));
    assert!(text.contains("static const char px_data[] =\n    \""));
    assert!(!text.contains("px_section_count"));
}

#[test]
fn byte_lists_wrap_at_fixed_count() {
    let rec = record(
        "w",
        ResourceKind::File {
            content: FileContent::Binary,
        },
        &[0u8; BYTES_PER_LINE * 2 + 1],
        &PackOptions::default(),
    );
    let text = emit_record(&rec);
    let data_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("    0x")).collect();
    assert_eq!(data_lines.len(), 3);
    assert_eq!(data_lines[0].matches("0x").count(), BYTES_PER_LINE);
    assert_eq!(data_lines[2].matches("0x").count(), 1);
}

#[test]
fn base64_lines_wrap_at_column() {
    let opts = PackOptions {
        encode: true,
        ..PackOptions::default()
    };
    let raw: Vec<u8> = (0..200u8).collect();
    let rec = record(
        "b",
        ResourceKind::File {
            content: FileContent::Binary,
        },
        &raw,
        &opts,
    );
    let text = emit_record(&rec);
    let quoted: Vec<&str> = text.lines().filter(|l| l.starts_with("    \"")).collect();
    assert!(quoted.len() > 1);
    for line in &quoted[..quoted.len() - 1] {
        assert_eq!(line.trim().len(), BASE64_LINE_WIDTH + 2);
    }
    assert!(quoted.last().unwrap().ends_with("\";"));
}

#[test]
fn split_payload_gets_section_table() {
    let opts = PackOptions {
        section_ceiling: 4,
        ..PackOptions::default()
    };
    let rec = record(
        "s",
        ResourceKind::File {
            content: FileContent::Binary,
        },
        &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        &opts,
    );
    let text = emit_record(&rec);
    assert!(text.contains("static const unsigned char s_data_0[] = {"));
    assert!(text.contains("static const unsigned char s_data_2[] = {"));
    assert!(text.contains("static const unsigned int s_section_count = 3;\n"));
    assert!(text.contains("static const unsigned int s_section_lengths[] = { 4, 4, 2 };\n"));
    assert!(text.contains("static const void *const s_sections[] = { s_data_0, s_data_1, s_data_2 };\n"));
}

#[test]
fn empty_payload_has_no_literal() {
    let rec = record(
        "e",
        ResourceKind::File {
            content: FileContent::Text,
        },
        &[],
        &PackOptions::default(),
    );
    let text = emit_record(&rec);
    assert!(text.contains("e_length = 0;"));
    assert!(!text.contains("e_data"));
}

#[test]
fn header_has_banner_and_stage_line() {
    let text = emit_header(&[], &PackOptions::default());
    assert_eq!(
        text,
        format!("{HEADER_BANNER}\n/* respack stages: raw, section ceiling: 65535 */\n")
    );
}
