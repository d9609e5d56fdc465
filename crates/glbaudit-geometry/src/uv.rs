//! Texture-space layout of a primitive.

use tracing::trace;

use crate::edge::{Edge, EdgeStore};
use crate::error::GeometryResult;
use crate::island::{label_islands, IslandMap};
use crate::margin::{find_margin_collision, MarginCollision};
use crate::overlap::flag_overlaps;
use crate::predicates::Point2;
use crate::triangle::{TriangleUv, UvBounds};
use crate::vertex::{VertexStoreUv, VertexUv};

/// Deduplicated UV topology: islands, overlap flags and what feeds them.
#[derive(Debug, Clone, PartialEq)]
pub struct UvTopology {
    pub vertices: Vec<VertexUv>,
    /// UV store indices of each triangle's corners, by triangle id.
    pub corners: Vec<[u32; 3]>,
    pub edges: Vec<Edge>,
    pub islands: IslandMap,
    /// Whether each triangle overlaps another, by triangle id.
    pub overlapping: Vec<bool>,
}

impl UvTopology {
    pub fn island_count(&self) -> usize {
        self.islands.len()
    }

    pub fn overlapping_count(&self) -> usize {
        self.overlapping.iter().filter(|o| **o).count()
    }

    pub fn zero_length_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_zero_length()).count()
    }
}

/// Incrementally collects UV corners while a primitive's faces are walked.
#[derive(Debug, Default)]
pub(crate) struct UvTopologyBuilder {
    vertices: VertexStoreUv,
    edges: EdgeStore,
    corners: Vec<[u32; 3]>,
}

impl UvTopologyBuilder {
    pub(crate) fn add(&mut self, triangle: u32, points: [Point2; 3]) {
        let corners = points.map(|p| self.vertices.insert(p));
        self.edges.link_triangle(corners, triangle);
        self.corners.push(corners);
    }

    pub(crate) fn finish(self, triangles: &[TriangleUv]) -> UvTopology {
        let islands = label_islands(self.vertices.len(), &self.corners);
        let overlapping = flag_overlaps(triangles, &self.corners);
        trace!(
            uv_vertices = self.vertices.len(),
            islands = islands.len(),
            overlapping = overlapping.iter().filter(|o| **o).count(),
            "labeled UV topology"
        );
        UvTopology {
            vertices: self.vertices.into_vertices(),
            corners: self.corners,
            edges: self.edges.into_edges(),
            islands,
            overlapping,
        }
    }
}

/// UV triangles of a primitive plus everything derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayout {
    pub triangles: Vec<TriangleUv>,
    /// Extents over all triangles; `None` without triangles.
    pub extents: Option<UvBounds>,
    /// Present only when UV indexing was requested.
    pub topology: Option<UvTopology>,
}

impl UvLayout {
    pub(crate) fn new(triangles: Vec<TriangleUv>, topology: Option<UvTopologyBuilder>) -> Self {
        let extents = triangles.iter().map(|t| t.bounds).reduce(UvBounds::union);
        let topology = topology.map(|builder| builder.finish(&triangles));
        Self {
            triangles,
            extents,
            topology,
        }
    }

    pub fn inverted_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.inverted).count()
    }

    /// True when every coordinate lies in `[0, 1]`. A layout with no
    /// triangles has nothing out of range.
    pub fn is_in_range_zero_to_one(&self) -> bool {
        self.extents.map_or(true, |e| e.is_within_unit_square())
    }

    /// Gutter check at `resolution`; `None` without a UV topology.
    pub fn margin_collision(&self, resolution: u32) -> GeometryResult<Option<Option<MarginCollision>>> {
        match &self.topology {
            Some(topology) => Ok(Some(find_margin_collision(
                &self.triangles,
                &topology.islands.triangle_islands,
                resolution,
            )?)),
            None => Ok(None),
        }
    }

    /// True when no two islands come closer than one grid cell at `resolution`.
    /// `None` without a UV topology.
    pub fn has_enough_margin(&self, resolution: u32) -> GeometryResult<Option<bool>> {
        Ok(self.margin_collision(resolution)?.map(|c| c.is_none()))
    }
}
