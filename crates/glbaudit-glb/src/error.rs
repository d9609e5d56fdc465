//! Error types for GLB packing and loading.

use glbaudit_geometry::GeometryError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for GLB operations.
pub type GlbResult<T> = Result<T, GlbError>;

/// Errors that can occur while packing, reading or loading GLB data.
#[derive(Debug, Error)]
pub enum GlbError {
    /// The glTF declares more than one buffer.
    #[error("Expected exactly one buffer, found {count}")]
    MultipleBuffers { count: usize },

    /// The glTF declares no buffer.
    #[error("The glTF document declares no buffer")]
    MissingBuffer,

    /// A multi-file set lacks a required file.
    #[error("No .{extension} file provided")]
    MissingFile { extension: &'static str },

    /// Failed to read an input file.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The glTF JSON has an unexpected shape.
    #[error("Invalid glTF JSON: {message}")]
    InvalidJson { message: String },

    /// The glTF JSON could not be parsed or written.
    #[error("Failed to process glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing the container.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container does not start with the `glTF` magic.
    #[error("Invalid GLB magic 0x{found:08X}")]
    InvalidMagic { found: u32 },

    /// The container version is not 2.
    #[error("Unsupported GLB version {version}")]
    UnsupportedVersion { version: u32 },

    /// The container ends before a declared length.
    #[error("GLB data truncated: needed {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// A chunk of the wrong type was found.
    #[error("Unexpected GLB chunk type 0x{found:08X}, expected 0x{expected:08X}")]
    UnexpectedChunk { expected: u32, found: u32 },

    /// The packed container would exceed the 32-bit length field.
    #[error("GLB container of {length} bytes exceeds the 4 GiB limit")]
    LengthOverflow { length: usize },

    /// The glTF document failed validation.
    #[error("Invalid glTF document: {0}")]
    Gltf(#[from] gltf::Error),

    /// A buffer other than the embedded binary chunk is referenced.
    #[error("Buffer {index} is not embedded in the GLB binary chunk")]
    ExternalBuffer { index: usize },

    /// An accessor cannot be read as primitive data.
    #[error("Accessor {index} cannot be read: {reason}")]
    UnsupportedAccessor { index: usize, reason: String },

    /// Primitive geometry could not be built.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl GlbError {
    /// Returns the error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            GlbError::MultipleBuffers { .. } => "GLB_001",
            GlbError::MissingBuffer => "GLB_002",
            GlbError::MissingFile { .. } => "GLB_003",
            GlbError::ReadFile { .. } => "GLB_004",
            GlbError::InvalidJson { .. } => "GLB_005",
            GlbError::Json(_) => "GLB_006",
            GlbError::Io(_) => "GLB_007",
            GlbError::InvalidMagic { .. } => "GLB_008",
            GlbError::UnsupportedVersion { .. } => "GLB_009",
            GlbError::Truncated { .. } => "GLB_010",
            GlbError::UnexpectedChunk { .. } => "GLB_011",
            GlbError::LengthOverflow { .. } => "GLB_012",
            GlbError::Gltf(_) => "GLB_013",
            GlbError::ExternalBuffer { .. } => "GLB_014",
            GlbError::UnsupportedAccessor { .. } => "GLB_015",
            GlbError::Geometry(e) => e.code(),
        }
    }

    pub(crate) fn invalid_json(message: impl Into<String>) -> Self {
        GlbError::InvalidJson {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message() {
        let err = GlbError::MissingFile { extension: "bin" };
        assert_eq!(err.to_string(), "No .bin file provided");
        assert_eq!(err.code(), "GLB_003");
    }

    #[test]
    fn test_geometry_code_passes_through() {
        let err = GlbError::from(GeometryError::InvalidResolution { resolution: 0 });
        assert_eq!(err.code(), "GEOM_005");
    }
}
