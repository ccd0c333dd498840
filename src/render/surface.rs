use std::collections::HashMap;

use crate::{
    codec::reconstruct,
    foundation::{
        core::{PixelBuffer, Rgb8},
        error::{RespackError, RespackResult},
    },
    render::composite::{composite, rows_in_order},
};

/// Pixel data handed to a display surface.
///
/// `stride` may be negative, in which case rows are consumed bottom-to-top.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceUpdate<'a> {
    pub name: &'a str,
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub stride: i32,
    pub raw_length_hint: Option<usize>,
}

impl<'a> SurfaceUpdate<'a> {
    /// Rows in consumption order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        rows_in_order(self.pixels, self.stride, self.height)
    }
}

/// The host toolkit's named, mutable bitmaps.
pub trait DisplaySurface {
    /// Colour used when a load does not name its own background.
    fn background(&self) -> Rgb8;

    /// Create or replace the surface called `update.name`.
    fn update(&mut self, update: SurfaceUpdate<'_>) -> RespackResult<()>;
}

/// Dimensions of a packed image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageLayout {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Overrides the surface background for RGBA images.
    pub background: Option<Rgb8>,
    pub flip_vertical: bool,
}

/// Reconstruct a packed image and push it to `surface`.
///
/// RGB and RGBA images are composited to opaque RGB first; gray images go through unchanged.
/// Any reconstruction failure aborts the load before the surface is touched.
#[tracing::instrument(skip(surface, encoded), fields(encoded_len = encoded.len()))]
pub fn load_into_surface(
    surface: &mut dyn DisplaySurface,
    name: &str,
    encoded: &[u8],
    layout: ImageLayout,
    opts: LoadOptions,
) -> RespackResult<()> {
    let expected = PixelBuffer::expected_len(layout.width, layout.height, layout.channels)?;
    let raw = reconstruct(encoded, expected)?;
    let buf = PixelBuffer::new(layout.width, layout.height, layout.channels, raw)?;

    if buf.channels() <= 2 {
        let stride = i32::try_from(buf.stride())
            .map_err(|_| RespackError::layout("row too wide for a surface"))?;
        let bytes = buf.as_bytes();
        return surface.update(SurfaceUpdate {
            name,
            pixels: bytes,
            width: buf.width(),
            height: buf.height(),
            channels: buf.channels(),
            stride: if opts.flip_vertical { -stride } else { stride },
            raw_length_hint: Some(bytes.len()),
        });
    }

    let background = opts.background.unwrap_or_else(|| surface.background());
    let target = composite(buf, Some(background), opts.flip_vertical)?;
    surface.update(SurfaceUpdate {
        name,
        pixels: &target.pixels,
        width: target.width,
        height: target.height,
        channels: 3,
        stride: target.stride,
        raw_length_hint: Some(target.pixels.len()),
    })
}

/// What a [`MemorySurface`] holds for one name: rows stored in the order they were consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

/// In-process display surface keeping the latest update per name.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    background: Rgb8,
    images: HashMap<String, SurfaceImage>,
    updates: usize,
}

impl MemorySurface {
    pub fn new(background: Rgb8) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&SurfaceImage> {
        self.images.get(name)
    }

    /// Number of accepted updates since creation.
    pub fn update_count(&self) -> usize {
        self.updates
    }
}

impl DisplaySurface for MemorySurface {
    fn background(&self) -> Rgb8 {
        self.background
    }

    fn update(&mut self, update: SurfaceUpdate<'_>) -> RespackResult<()> {
        let row_len = update.width as usize * usize::from(update.channels);
        if update.stride.unsigned_abs() as usize != row_len {
            return Err(RespackError::surface(format!(
                "stride {} does not match {} pixels of {} channels",
                update.stride, update.width, update.channels
            )));
        }
        if update.pixels.len() != row_len * update.height as usize {
            return Err(RespackError::surface(format!(
                "'{}' expects {} bytes, got {}",
                update.name,
                row_len * update.height as usize,
                update.pixels.len()
            )));
        }

        let pixels: Vec<u8> = update.rows().flatten().copied().collect();
        self.images.insert(
            update.name.to_string(),
            SurfaceImage {
                width: update.width,
                height: update.height,
                channels: update.channels,
                pixels,
            },
        );
        self.updates += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
