use std::io::Write;

use base64::Engine as _;
use flate2::{Compression, write::ZlibEncoder};

use crate::{
    codec::reconstruct::reconstruct,
    foundation::error::{RespackError, RespackResult},
};

/// Payload after zero, one or both transform stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBlob {
    /// Length of the payload before any stage ran.
    pub raw_length: usize,
    /// Transformed bytes; equal to the input when no stage ran.
    pub bytes: Vec<u8>,
    /// The zlib stage was applied and kept.
    pub compressed: bool,
    /// The base64 stage was applied.
    pub encoded: bool,
}

impl EncodedBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the stored bytes differ in form from the raw payload.
    pub fn is_transformed(&self) -> bool {
        self.compressed || self.encoded
    }
}

/// Run the packing stages in order: zlib at best ratio, then base64 over whatever came out.
///
/// A compressed (or compressed then encoded) stream that happens to be exactly as long as its
/// input is dropped in favour of the raw bytes: [`reconstruct`] treats "already the expected
/// length" as "nothing to undo".
pub fn pack(bytes: &[u8], use_compress: bool, use_encode: bool) -> RespackResult<EncodedBlob> {
    let raw_length = bytes.len();
    let mut out = bytes.to_vec();
    let mut compressed = false;

    if use_compress {
        let deflated = deflate(bytes)?;
        if deflated.len() == raw_length {
            tracing::debug!(raw_length, "compressed size equals raw size; storing raw");
        } else {
            tracing::debug!(raw_length, compressed_len = deflated.len(), "zlib stage applied");
            out = deflated;
            compressed = true;
        }
    }

    if use_encode {
        out = base64_encode(&out);
        if compressed && out.len() == raw_length {
            // Would read back as an untransformed payload; base64 of the raw bytes is always longer.
            tracing::debug!(raw_length, "encoded size equals raw size; dropping zlib stage");
            out = base64_encode(bytes);
            compressed = false;
        }
        tracing::debug!(encoded_len = out.len(), "base64 stage applied");
    }

    Ok(EncodedBlob {
        raw_length,
        bytes: out,
        compressed,
        encoded: use_encode,
    })
}

/// Reverse [`pack`] without knowing which stages it applied.
pub fn unpack(encoded: &[u8], expected_len: usize) -> RespackResult<Vec<u8>> {
    Ok(reconstruct(encoded, expected_len)?)
}

fn base64_encode(bytes: &[u8]) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .encode(bytes)
        .into_bytes()
}

fn deflate(bytes: &[u8]) -> RespackResult<Vec<u8>> {
    let scratch = bytes.len() + bytes.len() / 5 + 12;
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(scratch), Compression::best());
    encoder
        .write_all(bytes)
        .map_err(|e| RespackError::compress(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| RespackError::compress(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/transform.rs"]
mod tests;
