use crate::foundation::{
    core::{PixelBuffer, Rgb8},
    error::{RespackError, RespackResult},
};

/// Opaque RGB pixels in the layout a display surface without alpha support consumes.
///
/// A negative `stride` means rows are consumed bottom-to-top starting at
/// [`start_offset`](Self::start_offset); `pixels` itself is always stored top-to-bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeTarget {
    pub width: u32,
    pub height: u32,
    pub stride: i32,
    pub pixels: Vec<u8>,
}

impl CompositeTarget {
    /// Bytes per row.
    pub fn row_len(&self) -> usize {
        self.stride.unsigned_abs() as usize
    }

    pub fn is_flipped(&self) -> bool {
        self.stride < 0
    }

    /// Offset of the first row a consumer reads.
    pub fn start_offset(&self) -> usize {
        if self.is_flipped() {
            (self.height as usize).saturating_sub(1) * self.row_len()
        } else {
            0
        }
    }

    /// Rows in consumption order.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        rows_in_order(&self.pixels, self.stride, self.height)
    }
}

pub(crate) fn rows_in_order(
    pixels: &[u8],
    stride: i32,
    height: u32,
) -> impl Iterator<Item = &[u8]> + '_ {
    let row_len = stride.unsigned_abs() as usize;
    let h = height as usize;
    let flipped = stride < 0;
    (0..h).map(move |i| {
        let r = if flipped { h - 1 - i } else { i };
        &pixels[r * row_len..(r + 1) * row_len]
    })
}

/// Flatten an RGB or RGBA buffer onto an opaque background.
///
/// RGB passes through untouched. For RGBA each channel becomes
/// `(bg * (255 - a) + c * a) / 255`, truncated. `None` blends against black; callers that own a
/// surface resolve its background first (see [`load_into_surface`](super::load_into_surface)).
/// Gray buffers (1 or 2 channels) are rejected: they go to the surface directly.
pub fn composite(
    buf: PixelBuffer,
    background: Option<Rgb8>,
    flip_vertical: bool,
) -> RespackResult<CompositeTarget> {
    let (width, height, channels) = (buf.width(), buf.height(), buf.channels());
    let row_len = width as usize * 3;
    let stride = i32::try_from(row_len)
        .map_err(|_| RespackError::layout(format!("row of {width} pixels is too wide")))?;

    let pixels = match channels {
        3 => buf.into_bytes(),
        4 => {
            let bg = background.unwrap_or_default();
            let mut out = Vec::with_capacity(width as usize * height as usize * 3);
            for px in buf.as_bytes().chunks_exact(4) {
                out.extend_from_slice(&blend(px, bg));
            }
            out
        }
        n => {
            return Err(RespackError::layout(format!(
                "compositing needs 3 or 4 channels, got {n}"
            )));
        }
    };

    Ok(CompositeTarget {
        width,
        height,
        stride: if flip_vertical { -stride } else { stride },
        pixels,
    })
}

fn blend(px: &[u8], bg: Rgb8) -> [u8; 3] {
    let a = u32::from(px[3]);
    let inv = 255 - a;
    let mix = |c: u8, b: u8| ((u32::from(b) * inv + u32::from(c) * a) / 255) as u8;
    [mix(px[0], bg.r), mix(px[1], bg.g), mix(px[2], bg.b)]
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
