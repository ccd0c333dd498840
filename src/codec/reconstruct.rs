use std::{borrow::Cow, io::Read};

use base64::Engine as _;
use flate2::read::ZlibDecoder;

use crate::foundation::error::DecodeError;

/// Two-byte zlib header written by the compressor at its best-ratio setting.
///
/// Only this exact pair is recognised. Other valid zlib headers (`78 01`, `78 9C`, ...) are
/// treated as base64 text, which keeps previously packed resources decoding the same way.
pub const ZLIB_MAGIC: [u8; 2] = [0x78, 0xDA];

pub(crate) fn has_zlib_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZLIB_MAGIC)
}

/// Undo whichever of base64 and zlib were applied to a packed payload.
///
/// Stage presence is sniffed from the bytes rather than passed in, because payloads transcribed
/// into source text carry no record of how they were produced:
///
/// 1. Input that does not open with [`ZLIB_MAGIC`] is base64 text, unless it already has the
///    expected length (a payload packed with neither stage).
/// 2. If the length is still wrong and the bytes now open with [`ZLIB_MAGIC`], inflate them,
///    using `expected_len` as the output capacity.
/// 3. Whatever comes out must be exactly `expected_len` bytes long.
#[tracing::instrument(skip(encoded), fields(encoded_len = encoded.len()))]
pub fn reconstruct(encoded: &[u8], expected_len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Cow::Borrowed(encoded);

    if !has_zlib_magic(&buf) && buf.len() != expected_len {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(buf.as_ref())
            .map_err(|e| DecodeError::Base64(e.to_string()))?;
        tracing::debug!(decoded_len = decoded.len(), "base64 stage reversed");
        buf = Cow::Owned(decoded);
    }

    if buf.len() != expected_len {
        if !has_zlib_magic(&buf) {
            return Err(DecodeError::LengthMismatch {
                expected: expected_len,
                actual: buf.len(),
            });
        }
        let inflated = inflate(&buf, expected_len)?;
        tracing::debug!(inflated_len = inflated.len(), "zlib stage reversed");
        buf = Cow::Owned(inflated);
    }

    Ok(buf.into_owned())
}

fn inflate(stream: &[u8], expected_len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(expected_len);
    // One byte of slack is enough to tell "too long" apart from "exact".
    let limit = (expected_len as u64).saturating_add(1);
    ZlibDecoder::new(stream)
        .take(limit)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Inflate(e.to_string()))?;

    if out.len() != expected_len {
        return Err(DecodeError::LengthMismatch {
            expected: expected_len,
            actual: out.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/reconstruct.rs"]
mod tests;
