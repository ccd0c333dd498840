use base64::Engine as _;

use super::*;

#[test]
fn no_stage_is_identity() {
    let raw = b"abc\x00\xff".to_vec();
    let blob = pack(&raw, false, false).unwrap();
    assert_eq!(blob.bytes, raw);
    assert_eq!(blob.raw_length, raw.len());
    assert!(!blob.is_transformed());
}

#[test]
fn raw_length_is_always_the_input_length() {
    let raw = vec![3u8; 500];
    for (c, e) in [(true, false), (false, true), (true, true)] {
        let blob = pack(&raw, c, e).unwrap();
        assert_eq!(blob.raw_length, 500);
        assert_eq!(blob.encoded, e);
    }
}

#[test]
fn compressed_output_uses_best_ratio_header() {
    let blob = pack(&[1u8; 256], true, false).unwrap();
    assert!(blob.compressed);
    assert_eq!(&blob.bytes[..2], &crate::codec::reconstruct::ZLIB_MAGIC);
    assert!(blob.len() < 256);
}

#[test]
fn encoded_output_is_printable() {
    let blob = pack(&[0u8, 200, 17, 255], false, true).unwrap();
    assert!(blob.bytes.iter().all(|b| b.is_ascii_graphic()));
}

#[test]
fn every_combination_round_trips() {
    let payloads: Vec<Vec<u8>> = vec![
        vec![],
        vec![0x78, 0xDA],
        b"short".to_vec(),
        (0..=255u8).collect(),
        (0..5000u32).map(|i| (i * 31 % 251) as u8).collect(),
    ];
    for raw in &payloads {
        for c in [false, true] {
            for e in [false, true] {
                let blob = pack(raw, c, e).unwrap();
                let back = unpack(&blob.bytes, blob.raw_length).unwrap();
                assert_eq!(&back, raw, "compress={c} encode={e} len={}", raw.len());
            }
        }
    }
}

#[test]
fn encoded_zlib_of_raw_length_falls_back_to_encoded_raw() {
    // 16 zero bytes deflate to 11 bytes, whose base64 is 16 characters.
    let raw = vec![0u8; 16];
    let blob = pack(&raw, true, true).unwrap();
    assert!(!blob.compressed);
    assert!(blob.encoded);
    assert_eq!(
        blob.bytes,
        base64::engine::general_purpose::STANDARD
            .encode(&raw)
            .into_bytes()
    );
    assert_eq!(unpack(&blob.bytes, 16).unwrap(), raw);
}
