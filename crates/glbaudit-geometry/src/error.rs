//! Error types for the geometry engine.

use thiserror::Error;

use crate::margin::MAX_MARGIN_RESOLUTION;

/// Result type for geometry engine operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur while building primitive geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The primitive carries no vertex positions.
    #[error("Primitive '{mesh}' has no position data")]
    NoPositionData { mesh: String },

    /// A flattened attribute buffer does not hold whole vertices.
    #[error("Primitive '{mesh}' has a {attribute} buffer of {len} values, which is not a multiple of {stride}")]
    MalformedBuffer {
        mesh: String,
        attribute: &'static str,
        len: usize,
        stride: usize,
    },

    /// The index list does not describe whole triangles.
    #[error("Primitive '{mesh}' has {len} indices, which is not a whole number of triangles")]
    MalformedIndices { mesh: String, len: usize },

    /// A triangle references a vertex that does not exist.
    #[error("Primitive '{mesh}' references {attribute} vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        mesh: String,
        attribute: &'static str,
        index: u32,
        vertex_count: usize,
    },

    /// A margin grid needs between one and `MAX_MARGIN_RESOLUTION` cells per side.
    #[error("Margin resolution must be between 1 and {max}, got {resolution}", max = MAX_MARGIN_RESOLUTION)]
    InvalidResolution { resolution: u32 },
}

impl GeometryError {
    /// Returns the error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            GeometryError::NoPositionData { .. } => "GEOM_001",
            GeometryError::MalformedBuffer { .. } => "GEOM_002",
            GeometryError::MalformedIndices { .. } => "GEOM_003",
            GeometryError::IndexOutOfRange { .. } => "GEOM_004",
            GeometryError::InvalidResolution { .. } => "GEOM_005",
        }
    }
}
