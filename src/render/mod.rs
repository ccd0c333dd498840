//! Runtime side: opaque compositing and the display-surface boundary.

pub(crate) mod composite;
pub(crate) mod surface;

pub use composite::{CompositeTarget, composite};
pub use surface::{
    DisplaySurface, ImageLayout, LoadOptions, MemorySurface, SurfaceImage, SurfaceUpdate,
    load_into_surface,
};
