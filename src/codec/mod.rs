//! Byte transform stack: zlib then base64 when packing, content-sniffed reversal when loading.

pub(crate) mod reconstruct;
pub(crate) mod transform;

pub use reconstruct::{ZLIB_MAGIC, reconstruct};
pub use transform::{EncodedBlob, pack, unpack};
