use std::path::{Path, PathBuf};

use crate::foundation::error::{RespackError, RespackResult};

/// Largest literal emitted in one piece; longer payloads are split.
pub const DEFAULT_SECTION_CEILING: usize = 65_535;

/// Packing switches. Every combination is legal, including none (plain byte dump).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Run zlib (best ratio) over each payload.
    pub compress: bool,
    /// Base64-encode each payload after compression.
    pub encode: bool,
    /// Keep an existing output that is newer than every input.
    pub update_only: bool,
    /// Literal ceiling in encoded bytes.
    pub section_ceiling: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            compress: false,
            encode: false,
            update_only: false,
            section_ceiling: DEFAULT_SECTION_CEILING,
        }
    }
}

impl PackOptions {
    pub fn validate(&self) -> RespackResult<()> {
        if self.section_ceiling == 0 {
            return Err(RespackError::manifest("section_ceiling must be > 0"));
        }
        Ok(())
    }

    /// Short description of the enabled stages, as written into header comments.
    pub fn stages(&self) -> &'static str {
        stage_label(self.compress, self.encode)
    }
}

pub(crate) fn stage_label(compressed: bool, encoded: bool) -> &'static str {
    match (compressed, encoded) {
        (false, false) => "raw",
        (true, false) => "zlib",
        (false, true) => "base64",
        (true, true) => "zlib+base64",
    }
}

/// One file to pack.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PackInput {
    /// Symbol prefix; defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
    pub path: PathBuf,
}

impl PackInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            path: path.into(),
        }
    }

    pub fn named(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: Some(name.into()),
            path: path.into(),
        }
    }
}

/// JSON description of a batch: where to write, how to pack, and what.
///
/// ```json
/// { "output": "icons.h", "compress": true, "encode": true,
///   "inputs": [ { "name": "logo", "path": "img/logo.png" }, { "path": "LICENSE" } ] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    pub output: PathBuf,
    #[serde(flatten)]
    pub options: PackOptions,
    pub inputs: Vec<PackInput>,
}

impl Manifest {
    /// Load a manifest file; relative paths resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> RespackResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RespackError::io(format!("read manifest '{}'", path.display()), e))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&text, base)
    }

    pub fn from_json_str(text: &str, base_dir: &Path) -> RespackResult<Self> {
        let mut manifest: Manifest = serde_json::from_str(text)
            .map_err(|e| RespackError::manifest(format!("parse manifest JSON: {e}")))?;
        manifest.options.validate()?;
        if manifest.inputs.is_empty() {
            return Err(RespackError::manifest("manifest lists no inputs"));
        }

        if manifest.output.is_relative() {
            manifest.output = base_dir.join(&manifest.output);
        }
        for input in &mut manifest.inputs {
            if input.path.is_relative() {
                input.path = base_dir.join(&input.path);
            }
        }
        Ok(manifest)
    }
}
