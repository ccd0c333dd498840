use crate::foundation::error::{RespackError, RespackResult};

/// Opaque 8-bit RGB colour, used as the compositing background.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components as an array in `r, g, b` order.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Colour model implied by a channel count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorModel {
    /// 1 channel.
    Gray,
    /// 2 channels, gray then alpha.
    GrayAlpha,
    /// 3 channels.
    Rgb,
    /// 4 channels, straight (non-premultiplied) alpha.
    Rgba,
}

impl ColorModel {
    /// Map a channel count to its colour model.
    pub fn from_channels(channels: u8) -> RespackResult<Self> {
        match channels {
            1 => Ok(Self::Gray),
            2 => Ok(Self::GrayAlpha),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(RespackError::layout(format!(
                "channel count must be 1..=4, got {n}"
            ))),
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }
}

/// Decoded raster: row-major, top-to-bottom, tightly packed (`stride == width * channels`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Validate the layout and take ownership of `bytes`.
    ///
    /// Fails with `UnsupportedPixelLayout` for a bad channel count or empty dimension, and when
    /// `bytes.len() != width * height * channels`.
    pub fn new(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> RespackResult<Self> {
        let expected = Self::expected_len(width, height, channels)?;
        if bytes.len() != expected {
            return Err(RespackError::layout(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    /// Byte length required for a layout, checked before anything is allocated.
    pub fn expected_len(width: u32, height: u32, channels: u8) -> RespackResult<usize> {
        ColorModel::from_channels(channels)?;
        if width == 0 || height == 0 {
            return Err(RespackError::layout(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(usize::from(channels)))
            .ok_or_else(|| RespackError::layout("pixel buffer size overflow"))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn color_model(&self) -> ColorModel {
        // Validated in `new`.
        match self.channels {
            1 => ColorModel::Gray,
            2 => ColorModel::GrayAlpha,
            3 => ColorModel::Rgb,
            _ => ColorModel::Rgba,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * usize::from(self.channels)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the pixel bytes to the next stage.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
