//! Batch packer: files in, compiler-literal-safe header text out.

pub(crate) mod batch;
pub(crate) mod emit;
pub(crate) mod manifest;
pub(crate) mod parse;
pub(crate) mod record;

pub use batch::{PackReport, RecordFailure, pack_batch, write_batch};
pub use emit::{BASE64_LINE_WIDTH, BYTES_PER_LINE, emit_header, emit_record};
pub use manifest::{DEFAULT_SECTION_CEILING, Manifest, PackInput, PackOptions};
pub use parse::parse_header;
pub use record::{
    FileContent, ResourceKind, ResourceRecord, build_record, sanitize_identifier, section_names,
    split_sections,
};
