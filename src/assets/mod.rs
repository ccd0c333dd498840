//! PNG codec: the only raster format the packer recognises.

pub(crate) mod decode;
pub(crate) mod encode;

pub use decode::{PNG_SIGNATURE, decode, decode_bytes, is_png};
pub use encode::{encode, encode_bytes};
