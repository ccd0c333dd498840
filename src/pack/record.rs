use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{
    assets,
    codec::{EncodedBlob, pack},
    foundation::error::{RespackError, RespackResult},
    pack::manifest::PackOptions,
    registry::EmbeddedResource,
};

/// Whether an opaque file looked like text. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FileContent {
    Text,
    Binary,
}

impl FileContent {
    /// UTF-8 without NUL bytes counts as text.
    pub fn detect(bytes: &[u8]) -> Self {
        if !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok() {
            Self::Text
        } else {
            Self::Binary
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

/// What a packed payload holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResourceKind {
    /// Decoded pixels, `width * height * channels` bytes.
    Image { width: u32, height: u32, channels: u8 },
    /// File contents as read from disk.
    File { content: FileContent },
}

/// One packed input, ready to be rendered as source text.
#[derive(Clone, Debug)]
pub struct ResourceRecord {
    /// Identifier used as the prefix of every emitted symbol.
    pub name: String,
    /// File the record was built from.
    pub source: PathBuf,
    pub kind: ResourceKind,
    pub blob: EncodedBlob,
    /// Byte ranges of `blob.bytes`, in order, each at most the section ceiling long.
    pub sections: Vec<Range<usize>>,
}

impl ResourceRecord {
    pub fn raw_length(&self) -> usize {
        self.blob.raw_length
    }

    pub fn section_bytes(&self, index: usize) -> Option<&[u8]> {
        self.sections
            .get(index)
            .map(|range| &self.blob.bytes[range.clone()])
    }

    /// Symbol names of the data literals, in reassembly order.
    pub fn section_names(&self) -> Vec<String> {
        section_names(&self.name, self.sections.len())
    }

    /// Concatenate the sections back into the encoded stream.
    pub fn reassemble(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.blob.len());
        for range in &self.sections {
            out.extend_from_slice(&self.blob.bytes[range.clone()]);
        }
        out
    }

    /// Runtime view of this record, as a reader of the generated header would see it.
    pub fn to_embedded(&self) -> EmbeddedResource {
        EmbeddedResource {
            name: self.name.clone(),
            kind: self.kind,
            raw_length: self.blob.raw_length,
            encoded: self.reassemble(),
        }
    }
}

/// Symbol names for `count` data literals of resource `name`.
///
/// A single literal is `<name>_data`; split payloads number theirs from zero.
pub fn section_names(name: &str, count: usize) -> Vec<String> {
    if count == 1 {
        return vec![format!("{name}_data")];
    }
    (0..count).map(|i| format!("{name}_data_{i}")).collect()
}

/// Cut `len` bytes into consecutive ranges no longer than `ceiling`.
///
/// Yields `ceil(len / ceiling)` ranges; an empty payload has no sections.
pub fn split_sections(len: usize, ceiling: usize) -> Vec<Range<usize>> {
    let ceiling = ceiling.max(1);
    (0..len)
        .step_by(ceiling)
        .map(|start| start..(start + ceiling).min(len))
        .collect()
}

/// Turn an arbitrary resource name into a C identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() {
        return "resource".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Identifier for an input without an explicit name: its file stem.
pub fn default_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_identifier(&stem)
}

/// Read one input and run it through the image codec (when it is a PNG) and the transform stack.
///
/// Files that are not PNGs, or whose PNG data does not decode, are packed as opaque bytes. Only
/// I/O failures reach the caller.
pub fn build_record(name: &str, path: &Path, opts: &PackOptions) -> RespackResult<ResourceRecord> {
    let (kind, raw) = match assets::decode(path) {
        Ok(buf) => (
            ResourceKind::Image {
                width: buf.width(),
                height: buf.height(),
                channels: buf.channels(),
            },
            buf.into_bytes(),
        ),
        Err(RespackError::Io { context, source }) => {
            return Err(RespackError::Io { context, source });
        }
        Err(e) => {
            if e.is_format_mismatch() {
                tracing::debug!(path = %path.display(), "not a png; packing as file");
            } else {
                tracing::warn!(path = %path.display(), error = %e, "undecodable png; packing as file");
            }
            let bytes = std::fs::read(path)
                .map_err(|e| RespackError::io(format!("read '{}'", path.display()), e))?;
            let content = FileContent::detect(&bytes);
            (ResourceKind::File { content }, bytes)
        }
    };

    let blob = pack(&raw, opts.compress, opts.encode)?;
    let sections = split_sections(blob.len(), opts.section_ceiling);

    Ok(ResourceRecord {
        name: sanitize_identifier(name),
        source: path.to_path_buf(),
        kind,
        blob,
        sections,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pack/record.rs"]
mod tests;
