use std::{fs::File, io::Read, path::Path};

use anyhow::Context;
use image::DynamicImage;

use crate::foundation::{
    core::PixelBuffer,
    error::{RespackError, RespackResult},
};

/// Leading bytes of every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Return `true` when `bytes` starts with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Decode a PNG file into a tightly packed 8-bit RGB or RGBA buffer.
///
/// Files that do not carry the PNG signature fail with [`RespackError::FormatMismatch`]; the
/// signature is checked before the rest of the file is read.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn decode(path: impl AsRef<Path>) -> RespackResult<PixelBuffer> {
    let path = path.as_ref();
    let mut file =
        File::open(path).map_err(|e| RespackError::io(format!("open '{}'", path.display()), e))?;

    let mut sig = [0u8; PNG_SIGNATURE.len()];
    match file.read_exact(&mut sig) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(RespackError::format_mismatch(format!(
                "'{}' is shorter than the PNG signature",
                path.display()
            )));
        }
        Err(e) => return Err(RespackError::io(format!("read '{}'", path.display()), e)),
    }
    if !is_png(&sig) {
        return Err(RespackError::format_mismatch(format!(
            "'{}' has no PNG signature",
            path.display()
        )));
    }

    let mut bytes = sig.to_vec();
    file.read_to_end(&mut bytes)
        .map_err(|e| RespackError::io(format!("read '{}'", path.display()), e))?;
    decode_bytes(&bytes)
}

/// In-memory variant of [`decode`].
///
/// Bit depths above 8 keep the most significant byte of each sample, palette and grayscale
/// data expand to RGB, and any transparency information becomes a full alpha channel. The
/// result therefore always has 3 or 4 channels.
pub fn decode_bytes(bytes: &[u8]) -> RespackResult<PixelBuffer> {
    if !is_png(bytes) {
        return Err(RespackError::format_mismatch("missing PNG signature"));
    }

    let dyn_img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("decode png from memory")?;
    let (width, height) = (dyn_img.width(), dyn_img.height());

    let (channels, data) = match dyn_img {
        DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
        DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
        DynamicImage::ImageLuma8(img) => (3, gray_to_rgb(img.as_raw())),
        DynamicImage::ImageLumaA8(img) => (4, gray_alpha_to_rgba(img.as_raw())),
        DynamicImage::ImageRgb16(img) => (3, high_bytes(img.as_raw())),
        DynamicImage::ImageRgba16(img) => (4, high_bytes(img.as_raw())),
        DynamicImage::ImageLuma16(img) => (3, gray_to_rgb(&high_bytes(img.as_raw()))),
        DynamicImage::ImageLumaA16(img) => (4, gray_alpha_to_rgba(&high_bytes(img.as_raw()))),
        other => {
            if other.color().has_alpha() {
                (4, other.to_rgba8().into_raw())
            } else {
                (3, other.to_rgb8().into_raw())
            }
        }
    };

    tracing::debug!(width, height, channels, "decoded png");
    PixelBuffer::new(width, height, channels, data)
}

fn high_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().map(|s| (s >> 8) as u8).collect()
}

fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(gray.len() * 3);
    for &g in gray {
        out.extend_from_slice(&[g, g, g]);
    }
    out
}

fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(gray_alpha.len() * 2);
    for px in gray_alpha.chunks_exact(2) {
        out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
