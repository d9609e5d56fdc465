//! glbaudit geometry engine.
//!
//! Turns raw primitive buffers (positions, texture coordinates and a
//! triangle index list) into the facts a model audit needs:
//!
//! - deduplicated XYZ topology with manifold and hard-edge classification
//! - UV islands, UV triangle overlap, winding and range
//! - a rasterized gutter check between islands
//! - texel density per triangle
//!
//! Positions and UVs are compared after rounding to five decimal digits,
//! see [`vertex::MATCH_PRECISION`].
//!
//! # Example
//!
//! ```
//! use glbaudit_geometry::{IndexRequirements, ModelGeometry, PrimitiveBuffers};
//!
//! let quad = PrimitiveBuffers {
//!     name: "quad".to_string(),
//!     positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!     uvs: Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
//!     indices: vec![0, 2, 1, 0, 3, 2],
//! };
//!
//! let model = ModelGeometry::build(&[quad], IndexRequirements::ALL).unwrap();
//! let summary = model.summary();
//! assert_eq!(summary.triangle_count, 2);
//! assert_eq!(summary.non_manifold_edge_count, Some(0));
//! assert_eq!(summary.island_count, Some(1));
//! ```

pub mod classify;
pub mod config;
pub mod edge;
pub mod error;
pub mod island;
pub mod margin;
pub mod model;
pub mod overlap;
pub mod predicates;
pub mod primitive;
pub mod triangle;
pub mod uv;
pub mod vertex;

pub use classify::{EdgeClass, XyzTopology, HARD_EDGE_ANGLE, HARD_EDGE_TOLERANCE};
pub use config::{GutterWidths, IndexRequirements, GUTTER_RESOLUTIONS};
pub use edge::{Edge, EdgeKey, EdgeStore};
pub use error::{GeometryError, GeometryResult};
pub use island::{label_islands, Island, IslandMap};
pub use margin::{find_margin_collision, has_enough_margin, MarginCollision, SquareUv, MAX_MARGIN_RESOLUTION};
pub use model::{pixels_per_meter, GeometrySummary, ModelGeometry};
pub use overlap::{flag_overlaps, triangles_overlap, IndexedTriangle};
pub use primitive::{texel_density, Primitive, PrimitiveBuffers, PrimitiveStats};
pub use triangle::{TriangleUv, TriangleXyz, UvBounds, XyzBounds};
pub use uv::{UvLayout, UvTopology};
pub use vertex::{Vertex, VertexStore, VertexStoreUv, VertexStoreXyz, VertexUv, VertexXyz};
