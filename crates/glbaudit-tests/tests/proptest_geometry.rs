//! Property-based tests for the geometry engine using proptest.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p glbaudit-tests --test proptest_geometry
//! ```

use glbaudit_geometry::{
    label_islands, triangles_overlap, EdgeKey, EdgeStore, IndexRequirements, IndexedTriangle, Primitive,
    TriangleUv, VertexStoreUv,
};
use glbaudit_tests::fixtures::two_islands;
use proptest::prelude::*;

// ============================================================================
// 1. Vertex dedup
// ============================================================================

proptest! {
    /// Coordinates within 4e-6 of the same 5-decimal grid point share a vertex.
    #[test]
    fn nearby_coordinates_dedupe(
        k in -1_000_000i32..1_000_000,
        m in -1_000_000i32..1_000_000,
        du in -4e-6f64..4e-6,
        dv in -4e-6f64..4e-6,
    ) {
        let base = [f64::from(k) / 1e5, f64::from(m) / 1e5];
        let mut store = VertexStoreUv::new();
        let first = store.insert(base);
        let second = store.insert([base[0] + du, base[1] + dv]);
        prop_assert_eq!(first, second);
        prop_assert_eq!(store.len(), 1);
    }

    /// Inserting the same points a second time adds nothing.
    #[test]
    fn dedup_is_idempotent(points in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 1..64)) {
        let mut store = VertexStoreUv::new();
        let first: Vec<u32> = points.iter().map(|&(u, v)| store.insert([u, v])).collect();
        let len = store.len();
        let second: Vec<u32> = points.iter().map(|&(u, v)| store.insert([u, v])).collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(store.len(), len);
    }
}

// ============================================================================
// 2. Edge symmetry
// ============================================================================

proptest! {
    /// An edge is the same edge in either direction.
    #[test]
    fn edge_keys_are_symmetric(a in 0u32..1000, b in 0u32..1000) {
        prop_assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));

        let mut edges = EdgeStore::new();
        let forward = edges.link(a, b, 0);
        let backward = edges.link(b, a, 1);
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(edges.len(), 1);
        prop_assert_eq!(edges.get(forward).map(|e| e.triangles.clone()), Some(vec![0, 1]));
    }
}

// ============================================================================
// 3. Overlap symmetry
// ============================================================================

/// A UV point on a 1/8 grid inside the unit square.
fn grid_point() -> impl Strategy<Value = [f64; 2]> {
    (0u8..=8, 0u8..=8).prop_map(|(u, v)| [f64::from(u) / 8.0, f64::from(v) / 8.0])
}

proptest! {
    /// Triangles without shared corners overlap in both orders or neither.
    #[test]
    fn disjoint_overlap_is_symmetric(
        p in [grid_point(), grid_point(), grid_point()],
        q in [grid_point(), grid_point(), grid_point()],
    ) {
        let t = TriangleUv::new(0, p);
        let o = TriangleUv::new(1, q);
        let this = IndexedTriangle { triangle: &t, corners: [0, 1, 2] };
        let other = IndexedTriangle { triangle: &o, corners: [3, 4, 5] };
        prop_assert_eq!(triangles_overlap(this, other), triangles_overlap(other, this));
    }
}

// ============================================================================
// 4. Island labeling
// ============================================================================

fn triangle_corners(vertex_count: u32) -> impl Strategy<Value = Vec<[u32; 3]>> {
    prop::collection::vec([0..vertex_count, 0..vertex_count, 0..vertex_count], 1..24)
}

proptest! {
    /// Island membership does not depend on triangle order.
    #[test]
    fn islands_ignore_triangle_order(corners in triangle_corners(16)) {
        let forward = label_islands(16, &corners);
        let reversed_corners: Vec<_> = corners.iter().rev().copied().collect();
        let reversed = label_islands(16, &reversed_corners);

        prop_assert_eq!(&forward.vertex_islands, &reversed.vertex_islands);
        let mut back: Vec<u32> = reversed.triangle_islands.clone();
        back.reverse();
        prop_assert_eq!(&forward.triangle_islands, &back);
        prop_assert_eq!(forward.len(), reversed.len());
    }

    /// Triangles sharing a corner are always in the same island.
    #[test]
    fn shared_corners_share_islands(corners in triangle_corners(12)) {
        let map = label_islands(12, &corners);
        for (i, a) in corners.iter().enumerate() {
            for (j, b) in corners.iter().enumerate().skip(i + 1) {
                if a.iter().any(|v| b.contains(v)) {
                    prop_assert_eq!(map.triangle_islands[i], map.triangle_islands[j]);
                }
            }
        }
    }
}

// ============================================================================
// 5. Gutter check against resolution
// ============================================================================

proptest! {
    /// Two islands `g` apart collide once a grid cell is wider than the gap,
    /// and never once the gap spans more than two cells.
    #[test]
    fn gutter_follows_gap_width(gap in 0.05f32..0.25, center in 0.4f32..0.6) {
        let buffers = two_islands(gap, center);
        let requirements = IndexRequirements { xyz: false, uv: true };
        let prim = Primitive::build(&buffers, requirements).unwrap();
        let uv = prim.uv.as_ref().unwrap();

        let left = f64::from(center - gap / 2.0);
        let right = f64::from(center + gap / 2.0);
        let actual_gap = right - left;

        let coarse = (0.8 / actual_gap).floor() as u32;
        let fine = (2.5 / actual_gap).ceil() as u32;
        prop_assert_eq!(uv.has_enough_margin(coarse).unwrap(), Some(false));
        prop_assert_eq!(uv.has_enough_margin(fine).unwrap(), Some(true));
        prop_assert_eq!(uv.has_enough_margin(fine * 2).unwrap(), Some(true));
    }
}
