//! respack turns raster images and arbitrary files into byte arrays that can be compiled into a
//! program, and turns them back into pixels at load time.
//!
//! The pipeline has two halves:
//!
//! - Build time: [`assets::decode`] a PNG (or read any file), run it through the
//!   [`codec::pack`] transform stack, split it into sections and render source text with
//!   [`pack::pack_batch`].
//! - Load time: [`codec::reconstruct`] the original bytes, [`render::composite`] RGBA onto an
//!   opaque background and hand the result to a [`render::DisplaySurface`].
#![forbid(unsafe_code)]

mod foundation;

/// PNG decode and encode.
pub mod assets;
/// zlib + base64 transform stack and its reversal.
pub mod codec;
/// Batch packing into generated header text.
pub mod pack;
pub mod registry;
/// Compositing and display surfaces.
pub mod render;

pub use crate::foundation::core::{ColorModel, PixelBuffer, Rgb8};
pub use crate::foundation::error::{DecodeError, RespackError, RespackResult};

pub use crate::codec::{EncodedBlob, reconstruct};
pub use crate::pack::{Manifest, PackOptions, PackReport, pack_batch, write_batch};
pub use crate::registry::{EmbeddedResource, ResourceRegistry};
pub use crate::render::{DisplaySurface, LoadOptions, MemorySurface, composite, load_into_surface};
