//! Manifold and hard-edge classification of model-space edges.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::edge::Edge;
use crate::predicates::{cross3, signed_angle};
use crate::triangle::TriangleXyz;
use crate::vertex::VertexXyz;

/// Face angle (radians) at or above which an interior edge counts as hard.
pub const HARD_EDGE_ANGLE: f64 = FRAC_PI_2;

/// Slack on `HARD_EDGE_ANGLE` for normals computed from f32 positions.
pub const HARD_EDGE_TOLERANCE: f64 = 1e-5;

/// How an edge sits in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeClass {
    /// Open border of the surface, used by a single triangle.
    Boundary,
    /// Shared by exactly two triangles.
    Interior {
        /// Signed angle between the two face normals. `None` when either
        /// face is degenerate and has no normal.
        face_angle: Option<f64>,
    },
    /// Shared by three or more triangles, or linked to none.
    NonManifold { triangle_count: usize },
}

impl EdgeClass {
    /// Classifies `edge`, looking its triangles up by id in `triangles`.
    pub fn classify(edge: &Edge, triangles: &[TriangleXyz]) -> Self {
        match edge.triangles.as_slice() {
            [] => EdgeClass::NonManifold { triangle_count: 0 },
            [_] => EdgeClass::Boundary,
            [first, second] => {
                let normal = |id: &u32| triangles.get(*id as usize).and_then(|t| t.normal);
                let face_angle = match (normal(first), normal(second)) {
                    (Some(n0), Some(n1)) => Some(signed_angle(n0, n1, cross3(n0, n1))),
                    _ => None,
                };
                EdgeClass::Interior { face_angle }
            }
            many => EdgeClass::NonManifold {
                triangle_count: many.len(),
            },
        }
    }

    pub fn is_manifold(&self) -> bool {
        !matches!(self, EdgeClass::NonManifold { .. })
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, EdgeClass::Interior { face_angle: Some(angle) } if *angle >= HARD_EDGE_ANGLE - HARD_EDGE_TOLERANCE)
    }
}

/// Deduplicated model-space topology of one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzTopology {
    pub vertices: Vec<VertexXyz>,
    /// Vertex-store indices of each triangle's corners, by triangle id.
    pub corners: Vec<[u32; 3]>,
    pub edges: Vec<Edge>,
    /// Classification of each edge, parallel to `edges`.
    pub classes: Vec<EdgeClass>,
}

impl XyzTopology {
    pub fn hard_edge_count(&self) -> usize {
        self.classes.iter().filter(|c| c.is_hard()).count()
    }

    pub fn non_manifold_edge_count(&self) -> usize {
        self.classes.iter().filter(|c| !c.is_manifold()).count()
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|c| matches!(c, EdgeClass::Boundary))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_with(triangles: Vec<u32>) -> Edge {
        Edge {
            index: 0,
            vertex_a: 0,
            vertex_b: 1,
            triangles,
        }
    }

    fn folded_pair(tip: [f64; 3]) -> Vec<TriangleXyz> {
        // Both faces share edge (0,0,0)-(1,0,0) and wind consistently.
        vec![
            TriangleXyz::new(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            TriangleXyz::new(1, [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], tip]),
        ]
    }

    #[test]
    fn test_single_triangle_is_boundary() {
        let class = EdgeClass::classify(&edge_with(vec![0]), &folded_pair([0.0, -1.0, 0.0]));
        assert_eq!(class, EdgeClass::Boundary);
        assert!(class.is_manifold());
        assert!(!class.is_hard());
    }

    #[test]
    fn test_flat_interior_edge_is_soft() {
        let triangles = folded_pair([0.0, -1.0, 0.0]);
        let class = EdgeClass::classify(&edge_with(vec![0, 1]), &triangles);
        assert!(class.is_manifold());
        assert!(!class.is_hard());
    }

    #[test]
    fn test_right_angle_edge_is_hard() {
        let triangles = folded_pair([0.0, 0.0, 1.0]);
        let class = EdgeClass::classify(&edge_with(vec![0, 1]), &triangles);
        assert!(class.is_hard());
    }

    #[test]
    fn test_near_right_angle_edge_is_hard() {
        // f32 rounding of a rotated right angle lands a hair below 90 degrees
        let class = EdgeClass::Interior {
            face_angle: Some(HARD_EDGE_ANGLE - 1e-7),
        };
        assert!(class.is_hard());

        let class = EdgeClass::Interior {
            face_angle: Some(HARD_EDGE_ANGLE - 1e-3),
        };
        assert!(!class.is_hard());
    }

    #[test]
    fn test_unlinked_edge_is_non_manifold() {
        let class = EdgeClass::classify(&edge_with(vec![]), &[]);
        assert_eq!(class, EdgeClass::NonManifold { triangle_count: 0 });
        assert!(!class.is_manifold());
    }

    #[test]
    fn test_shallow_fold_is_soft() {
        let triangles = folded_pair([0.0, -1.0, 0.5]);
        let class = EdgeClass::classify(&edge_with(vec![0, 1]), &triangles);
        match class {
            EdgeClass::Interior {
                face_angle: Some(angle),
            } => assert!(angle > 0.0 && angle < HARD_EDGE_ANGLE),
            other => panic!("unexpected class {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_face_has_no_angle() {
        let triangles = vec![
            TriangleXyz::new(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            TriangleXyz::new(1, [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]),
        ];
        let class = EdgeClass::classify(&edge_with(vec![0, 1]), &triangles);
        assert_eq!(class, EdgeClass::Interior { face_angle: None });
        assert!(!class.is_hard());
    }

    #[test]
    fn test_three_triangles_is_non_manifold() {
        let triangles = folded_pair([0.0, 0.0, 1.0]);
        let class = EdgeClass::classify(&edge_with(vec![0, 1, 1]), &triangles);
        assert_eq!(class, EdgeClass::NonManifold { triangle_count: 3 });
        assert!(!class.is_manifold());
        assert!(!class.is_hard());
    }
}
