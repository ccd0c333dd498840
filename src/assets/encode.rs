use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};

use crate::foundation::{
    core::{ColorModel, PixelBuffer},
    error::{RespackError, RespackResult},
};

/// Write `buf` as a PNG file, mapping the channel count onto the matching colour model.
pub fn encode(path: impl AsRef<Path>, buf: &PixelBuffer) -> RespackResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| RespackError::io(format!("create '{}'", path.display()), e))?;

    let mut writer = BufWriter::new(file);
    encode_to(&mut writer, buf)?;

    let file = writer
        .into_inner()
        .map_err(|e| RespackError::io(format!("flush '{}'", path.display()), e.into_error()))?;
    file.sync_all()
        .map_err(|e| RespackError::io(format!("close '{}'", path.display()), e))?;
    Ok(())
}

/// Encode into an in-memory PNG stream.
pub fn encode_bytes(buf: &PixelBuffer) -> RespackResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(&mut out, buf)?;
    Ok(out)
}

fn encode_to<W: Write>(writer: W, buf: &PixelBuffer) -> RespackResult<()> {
    let color = match buf.color_model() {
        ColorModel::Gray => ExtendedColorType::L8,
        ColorModel::GrayAlpha => ExtendedColorType::La8,
        ColorModel::Rgb => ExtendedColorType::Rgb8,
        ColorModel::Rgba => ExtendedColorType::Rgba8,
    };

    PngEncoder::new(writer)
        .write_image(buf.as_bytes(), buf.width(), buf.height(), color)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => RespackError::io("write png stream", io),
            other => RespackError::Other(anyhow::Error::new(other).context("encode png")),
        })
}
