//! Primitive construction: raw buffers in, triangles and topologies out.
//!
//! Building is a single pass over the index list. Triangles are created in
//! index order and their ids are their positions in that list, which every
//! derived structure (edges, islands, overlap flags) refers back to.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{EdgeClass, XyzTopology};
use crate::config::IndexRequirements;
use crate::edge::EdgeStore;
use crate::error::{GeometryError, GeometryResult};
use crate::predicates::{Point2, Vec3};
use crate::triangle::{TriangleUv, TriangleXyz, XyzBounds};
use crate::uv::{UvLayout, UvTopologyBuilder};
use crate::vertex::VertexStoreXyz;

/// Raw attribute buffers of one mesh primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveBuffers {
    /// Display name, e.g. `"Cube"` or `"Cube#1"`.
    pub name: String,
    /// Flattened XYZ positions, three floats per vertex.
    pub positions: Vec<f32>,
    /// Flattened UV coordinates, two floats per vertex.
    pub uvs: Option<Vec<f32>>,
    /// Triangle list, three indices per face.
    pub indices: Vec<u32>,
}

impl PrimitiveBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    fn validate(&self) -> GeometryResult<()> {
        if self.positions.is_empty() {
            return Err(GeometryError::NoPositionData {
                mesh: self.name.clone(),
            });
        }
        if self.positions.len() % 3 != 0 {
            return Err(GeometryError::MalformedBuffer {
                mesh: self.name.clone(),
                attribute: "POSITION",
                len: self.positions.len(),
                stride: 3,
            });
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() % 2 != 0 {
                return Err(GeometryError::MalformedBuffer {
                    mesh: self.name.clone(),
                    attribute: "TEXCOORD_0",
                    len: uvs.len(),
                    stride: 2,
                });
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::MalformedIndices {
                mesh: self.name.clone(),
                len: self.indices.len(),
            });
        }
        Ok(())
    }

    fn position(&self, index: u32) -> GeometryResult<Vec3> {
        let base = index as usize * 3;
        match self.positions.get(base..base + 3) {
            Some(p) => Ok([f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]),
            None => Err(GeometryError::IndexOutOfRange {
                mesh: self.name.clone(),
                attribute: "POSITION",
                index,
                vertex_count: self.positions.len() / 3,
            }),
        }
    }

    fn uv(&self, uvs: &[f32], index: u32) -> GeometryResult<Point2> {
        let base = index as usize * 2;
        match uvs.get(base..base + 2) {
            Some(p) => Ok([f64::from(p[0]), f64::from(p[1])]),
            None => Err(GeometryError::IndexOutOfRange {
                mesh: self.name.clone(),
                attribute: "TEXCOORD_0",
                index,
                vertex_count: uvs.len() / 2,
            }),
        }
    }
}

/// Per-primitive statistics. Counts are `None` when the data they need was
/// not requested or is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveStats {
    pub triangle_count: usize,
    pub hard_edge_count: Option<usize>,
    pub non_manifold_edge_count: Option<usize>,
    pub inverted_triangle_count: Option<usize>,
    pub overlapping_triangle_count: Option<usize>,
    pub island_count: Option<usize>,
    /// Smallest UV-area to XYZ-area ratio over all triangles.
    pub density_min: Option<f64>,
    /// Largest UV-area to XYZ-area ratio over all triangles.
    pub density_max: Option<f64>,
    /// Extents of the referenced positions.
    pub bounds: Option<XyzBounds>,
}

impl PrimitiveStats {
    fn collect(triangles: &[TriangleXyz], xyz: Option<&XyzTopology>, uv: Option<&UvLayout>) -> Self {
        let topology = uv.and_then(|u| u.topology.as_ref());
        let (density_min, density_max) = uv
            .map(|layout| density_range(triangles, &layout.triangles))
            .unwrap_or((None, None));

        Self {
            triangle_count: triangles.len(),
            hard_edge_count: xyz.map(XyzTopology::hard_edge_count),
            non_manifold_edge_count: xyz.map(XyzTopology::non_manifold_edge_count),
            inverted_triangle_count: uv.map(UvLayout::inverted_count),
            overlapping_triangle_count: topology.map(|t| t.overlapping_count()),
            island_count: topology.map(|t| t.island_count()),
            density_min,
            density_max,
            bounds: XyzBounds::of_triangles(triangles),
        }
    }
}

/// Texel density of one face: UV area per unit of model area, 0 for a
/// face with no model area.
pub fn texel_density(xyz: &TriangleXyz, uv: &TriangleUv) -> f64 {
    if xyz.area > 0.0 {
        uv.area / xyz.area
    } else {
        0.0
    }
}

fn density_range(xyz: &[TriangleXyz], uv: &[TriangleUv]) -> (Option<f64>, Option<f64>) {
    xyz.iter()
        .zip(uv)
        .map(|(x, u)| texel_density(x, u))
        .fold((None, None), |(min, max): (Option<f64>, Option<f64>), d| {
            (
                Some(min.map_or(d, |m| m.min(d))),
                Some(max.map_or(d, |m| m.max(d))),
            )
        })
}

/// A fully built primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    /// One face per index triple, in index-list order.
    pub triangles: Vec<TriangleXyz>,
    /// Present only when XYZ indexing was requested.
    pub xyz: Option<XyzTopology>,
    /// Present whenever the primitive has UVs.
    pub uv: Option<UvLayout>,
    pub stats: PrimitiveStats,
}

impl Primitive {
    /// Builds triangles, optional topologies and statistics for `buffers`.
    pub fn build(buffers: &PrimitiveBuffers, requirements: IndexRequirements) -> GeometryResult<Self> {
        buffers.validate()?;

        let face_count = buffers.indices.len() / 3;
        let mut triangles = Vec::with_capacity(face_count);
        let mut xyz_vertices = requirements.xyz.then(VertexStoreXyz::new);
        let mut xyz_edges = EdgeStore::new();
        let mut xyz_corners = Vec::new();

        let uvs = buffers.uvs.as_deref();
        let mut uv_triangles = uvs.map(|_| Vec::with_capacity(face_count));
        let mut uv_builder = uvs.and_then(|_| requirements.uv.then(UvTopologyBuilder::default));

        for (id, face) in buffers.indices.chunks_exact(3).enumerate() {
            let id = id as u32;
            let [a, b, c] = [face[0], face[1], face[2]];
            let positions = [buffers.position(a)?, buffers.position(b)?, buffers.position(c)?];
            triangles.push(TriangleXyz::new(id, positions));

            if let Some(store) = xyz_vertices.as_mut() {
                let corners = positions.map(|p| store.insert(p));
                xyz_edges.link_triangle(corners, id);
                xyz_corners.push(corners);
            }

            if let (Some(uvs), Some(uv_triangles)) = (uvs, uv_triangles.as_mut()) {
                let points = [buffers.uv(uvs, a)?, buffers.uv(uvs, b)?, buffers.uv(uvs, c)?];
                uv_triangles.push(TriangleUv::new(id, points));
                if let Some(builder) = uv_builder.as_mut() {
                    builder.add(id, points);
                }
            }
        }

        let xyz = xyz_vertices.map(|store| {
            let edges = xyz_edges.into_edges();
            let classes = edges.iter().map(|e| EdgeClass::classify(e, &triangles)).collect();
            XyzTopology {
                vertices: store.into_vertices(),
                corners: xyz_corners,
                edges,
                classes,
            }
        });
        let uv = uv_triangles.map(|t| UvLayout::new(t, uv_builder));
        let stats = PrimitiveStats::collect(&triangles, xyz.as_ref(), uv.as_ref());

        debug!(
            primitive = %buffers.name,
            triangles = stats.triangle_count,
            xyz_vertices = xyz.as_ref().map(|t| t.vertices.len()),
            islands = stats.island_count,
            "built primitive"
        );

        Ok(Self {
            name: buffers.name.clone(),
            triangles,
            xyz,
            uv,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quad() -> PrimitiveBuffers {
        PrimitiveBuffers {
            name: "quad".to_string(),
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            uvs: Some(vec![0.0, 0.0, 0.5, 0.0, 0.5, 0.5, 0.0, 0.5]),
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }

    #[test]
    fn test_build_without_requirements() {
        let prim = Primitive::build(&quad(), IndexRequirements::NONE).unwrap();
        assert_eq!(prim.triangles.len(), 2);
        assert!(prim.xyz.is_none());
        let uv = prim.uv.as_ref().unwrap();
        assert!(uv.topology.is_none());
        assert_eq!(prim.stats.hard_edge_count, None);
        assert_eq!(prim.stats.island_count, None);
        assert_eq!(prim.stats.inverted_triangle_count, Some(0));
    }

    #[test]
    fn test_build_all() {
        let prim = Primitive::build(&quad(), IndexRequirements::ALL).unwrap();
        let xyz = prim.xyz.as_ref().unwrap();
        assert_eq!(xyz.vertices.len(), 4);
        assert_eq!(xyz.edges.len(), 5);
        assert_eq!(xyz.boundary_edge_count(), 4);
        let stats = prim.stats;
        assert_eq!(stats.triangle_count, 2);
        assert_eq!(stats.hard_edge_count, Some(0));
        assert_eq!(stats.non_manifold_edge_count, Some(0));
        assert_eq!(stats.inverted_triangle_count, Some(0));
        assert_eq!(stats.overlapping_triangle_count, Some(0));
        assert_eq!(stats.island_count, Some(1));
        for density in [stats.density_min, stats.density_max] {
            assert!(density.is_some_and(|d| (d - 0.25).abs() < 1e-9));
        }
    }

    #[test]
    fn test_split_vertices_are_merged() {
        // same quad with every corner duplicated per face
        let buffers = PrimitiveBuffers {
            name: "split".to_string(),
            positions: vec![
                0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0,
            ],
            uvs: None,
            indices: vec![0, 1, 2, 3, 4, 5],
        };
        let prim = Primitive::build(&buffers, IndexRequirements::ALL).unwrap();
        let xyz = prim.xyz.as_ref().unwrap();
        assert_eq!(xyz.vertices.len(), 4);
        assert_eq!(xyz.edges.len(), 5);
        assert!(prim.uv.is_none());
        assert_eq!(prim.stats.density_min, None);
    }

    #[test]
    fn test_no_positions() {
        let buffers = PrimitiveBuffers {
            name: "empty".to_string(),
            ..Default::default()
        };
        let err = Primitive::build(&buffers, IndexRequirements::ALL).unwrap_err();
        assert_eq!(err.code(), "GEOM_001");
    }

    #[test]
    fn test_malformed_indices() {
        let mut buffers = quad();
        buffers.indices.push(1);
        let err = Primitive::build(&buffers, IndexRequirements::NONE).unwrap_err();
        assert_eq!(
            err,
            GeometryError::MalformedIndices {
                mesh: "quad".to_string(),
                len: 7,
            }
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let mut buffers = quad();
        buffers.indices[4] = 9;
        let err = Primitive::build(&buffers, IndexRequirements::NONE).unwrap_err();
        assert_eq!(err.code(), "GEOM_004");
    }

    #[test]
    fn test_short_uv_buffer() {
        let mut buffers = quad();
        buffers.uvs = Some(vec![0.0, 0.0, 1.0, 0.0]);
        let err = Primitive::build(&buffers, IndexRequirements::NONE).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexOutOfRange {
                attribute: "TEXCOORD_0",
                ..
            }
        ));
    }

    #[test]
    fn test_no_faces() {
        let mut buffers = quad();
        buffers.indices.clear();
        let prim = Primitive::build(&buffers, IndexRequirements::ALL).unwrap();
        assert_eq!(prim.stats.triangle_count, 0);
        assert_eq!(prim.stats.density_max, None);
        assert_eq!(prim.stats.island_count, Some(0));
    }

    #[test]
    fn test_zero_area_face_has_zero_density() {
        let buffers = PrimitiveBuffers {
            name: "sliver".to_string(),
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            uvs: Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
            indices: vec![0, 1, 2],
        };
        let prim = Primitive::build(&buffers, IndexRequirements::NONE).unwrap();
        assert_eq!(prim.stats.density_min, Some(0.0));
        assert_eq!(prim.stats.density_max, Some(0.0));
    }
}
