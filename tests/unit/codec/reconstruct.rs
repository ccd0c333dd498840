use std::io::Write as _;

use base64::Engine as _;

use super::*;

fn zlib_best(bytes: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

fn b64(bytes: &[u8]) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .encode(bytes)
        .into_bytes()
}

#[test]
fn best_compression_starts_with_magic() {
    assert!(has_zlib_magic(&zlib_best(b"hello hello hello")));
}

#[test]
fn raw_payload_of_expected_length_passes_through() {
    let raw = b"plain bytes".to_vec();
    assert_eq!(reconstruct(&raw, raw.len()).unwrap(), raw);
}

#[test]
fn raw_payload_starting_with_magic_passes_through() {
    let raw = vec![0x78, 0xDA, 1, 2, 3];
    assert_eq!(reconstruct(&raw, raw.len()).unwrap(), raw);
}

#[test]
fn base64_only() {
    let raw = vec![0u8, 1, 2, 250, 251, 252, 253];
    assert_eq!(reconstruct(&b64(&raw), raw.len()).unwrap(), raw);
}

#[test]
fn zlib_only() {
    let raw = vec![42u8; 300];
    assert_eq!(reconstruct(&zlib_best(&raw), raw.len()).unwrap(), raw);
}

#[test]
fn zlib_then_base64() {
    let raw: Vec<u8> = (0..1000u32).map(|i| (i % 7) as u8).collect();
    let packed = b64(&zlib_best(&raw));
    assert_eq!(reconstruct(&packed, raw.len()).unwrap(), raw);
}

#[test]
fn invalid_base64_is_fatal() {
    let err = reconstruct(b"not*base64!", 3).unwrap_err();
    assert!(matches!(err, DecodeError::Base64(_)));
}

#[test]
fn other_zlib_headers_are_not_sniffed() {
    let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(&[5u8; 64]).unwrap();
    let default_level = enc.finish().unwrap();
    assert_eq!(&default_level[..2], &[0x78, 0x9C]);
    assert!(reconstruct(&default_level, 64).is_err());
}

#[test]
fn wrong_expected_length_is_reported() {
    let raw = vec![9u8; 100];
    let err = reconstruct(&zlib_best(&raw), 99).unwrap_err();
    assert_eq!(
        err,
        DecodeError::LengthMismatch {
            expected: 99,
            actual: 100
        }
    );

    let err = reconstruct(&zlib_best(&raw), 150).unwrap_err();
    assert_eq!(
        err,
        DecodeError::LengthMismatch {
            expected: 150,
            actual: 100
        }
    );
}

#[test]
fn decoded_but_not_compressed_with_wrong_length() {
    let err = reconstruct(&b64(b"abcd"), 10).unwrap_err();
    assert_eq!(
        err,
        DecodeError::LengthMismatch {
            expected: 10,
            actual: 4
        }
    );
}

#[test]
fn truncated_stream_is_fatal() {
    let raw: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let full = zlib_best(&raw);
    let cut = &full[..full.len() / 2];
    assert!(reconstruct(cut, raw.len()).is_err());
}

#[test]
fn empty_payload_round_trips() {
    assert_eq!(reconstruct(&[], 0).unwrap(), Vec::<u8>::new());
    assert_eq!(reconstruct(&zlib_best(&[]), 0).unwrap(), Vec::<u8>::new());
}
