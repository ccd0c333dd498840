/// Convenience result alias used across the pipeline.
pub type RespackResult<T> = Result<T, RespackError>;

/// Failures while reversing the transform stack of a packed payload.
///
/// Always terminal for the resource being loaded: a buffer that fails any of these checks is
/// never handed to a display surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload did not start with the compressor header and was not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(String),

    /// The inflater rejected the stream.
    #[error("inflate failed: {0}")]
    Inflate(String),

    /// A stage produced a buffer of the wrong size.
    #[error("decoded length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length the caller asked for.
        expected: usize,
        /// Length actually produced.
        actual: usize,
    },
}

/// Top-level error for every pipeline stage.
#[derive(thiserror::Error, Debug)]
pub enum RespackError {
    /// Signature bytes did not match the raster format; callers fall back to opaque-file
    /// handling.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// Open/read/write/close failure.
    #[error("io error: {context}: {source}")]
    Io {
        /// What was being done, usually including the path.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Compression or encoding failed.
    #[error("compress error: {0}")]
    Compress(String),

    /// Decompression, base64 or length check failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Channel count outside 1..=4 or an empty dimension.
    #[error("unsupported pixel layout: {0}")]
    UnsupportedPixelLayout(String),

    /// The display surface refused an update.
    #[error("surface error: {0}")]
    Surface(String),

    /// No resource is registered under the requested name.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Batch description could not be loaded.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Generated header text could not be read back.
    #[error("header parse error: line {line}: {message}")]
    HeaderParse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RespackError {
    pub fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn compress(msg: impl Into<String>) -> Self {
        Self::Compress(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::UnsupportedPixelLayout(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }

    pub fn header(line: usize, msg: impl Into<String>) -> Self {
        Self::HeaderParse {
            line,
            message: msg.into(),
        }
    }

    /// `true` for the recoverable "not a raster file" case.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
