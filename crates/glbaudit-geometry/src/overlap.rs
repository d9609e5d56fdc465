//! Pairwise UV triangle overlap.
//!
//! Triangles that share UV vertices are tested against the shared corners
//! only, so neighbours in a clean island never count as overlapping.

use crate::predicates::{is_counter_clockwise, segments_intersect};
use crate::triangle::TriangleUv;

/// A UV triangle with the UV store indices of its corners.
#[derive(Debug, Clone, Copy)]
pub struct IndexedTriangle<'a> {
    pub triangle: &'a TriangleUv,
    pub corners: [u32; 3],
}

/// Tests whether `this` overlaps `other`.
///
/// The shared-corner branches pick their probe points from `this`, so the
/// result is not symmetric in every degenerate case. Callers that need a
/// symmetric answer test both orders.
pub fn triangles_overlap(this: IndexedTriangle<'_>, other: IndexedTriangle<'_>) -> bool {
    let (t, o) = (this.triangle, other.triangle);
    if t.id == o.id || !t.has_area() || !o.has_area() {
        return false;
    }
    if !t.bounds.overlaps(&o.bounds) {
        return false;
    }

    let [a, b, c] = this.corners;
    let [oa, ob, oc] = other.corners;

    // `x_y`: this triangle's corner x is other's corner y
    let (a_a, a_b, a_c) = (a == oa, a == ob, a == oc);
    let (b_a, b_b, b_c) = (b == oa, b == ob, b == oc);
    let (c_a, c_b, c_c) = (c == oa, c == ob, c == oc);

    let a_matches = a_a || a_b || a_c;
    let b_matches = b_a || b_b || b_c;
    let c_matches = c_a || c_b || c_c;
    let shared = [a_matches, b_matches, c_matches]
        .iter()
        .filter(|m| **m)
        .count();

    let [pa, pb, pc] = t.points;
    let [qa, qb, qc] = o.points;

    match shared {
        3 => true,
        2 => {
            // Shared edge: overlap when the free corners lie on the same side.
            let edge_p1 = if a_matches { pa } else { pb };
            let edge_p2 = if c_matches { pc } else { pb };
            let free = if !a_matches {
                pa
            } else if !b_matches {
                pb
            } else {
                pc
            };
            let other_free = if !(a_b || b_b || c_b) {
                qb
            } else if !(a_c || b_c || c_c) {
                qc
            } else {
                qa
            };
            is_counter_clockwise(free, edge_p1, edge_p2)
                == is_counter_clockwise(other_free, edge_p1, edge_p2)
        }
        1 => {
            let common = if a_matches {
                pa
            } else if b_matches {
                pb
            } else {
                pc
            };
            let p1 = if !a_matches { pa } else { pb };
            let p2 = if !c_matches { pc } else { pb };
            let (q1, q2) = if a_a || b_a || c_a {
                (qb, qc)
            } else if a_b || b_b || c_b {
                (qa, qc)
            } else {
                (qa, qb)
            };

            t.contains_point(q1)
                || t.contains_point(q2)
                || o.contains_point(p1)
                || o.contains_point(p2)
                || segments_intersect(common, q1, p1, p2)
                || segments_intersect(common, q2, p1, p2)
                || segments_intersect(common, p1, q1, q2)
                || segments_intersect(common, p2, q1, q2)
        }
        _ => {
            let mine = [pa, pb, pc];
            let theirs = [qa, qb, qc];
            if theirs.iter().any(|q| t.contains_point(*q)) || mine.iter().any(|p| o.contains_point(*p)) {
                return true;
            }
            let mine_edges = [(pa, pb), (pb, pc), (pc, pa)];
            let their_edges = [(qa, qb), (qb, qc), (qc, qa)];
            mine_edges.iter().any(|(p1, p2)| {
                their_edges
                    .iter()
                    .any(|(q1, q2)| segments_intersect(*p1, *p2, *q1, *q2))
            })
        }
    }
}

/// Flags every triangle that overlaps at least one other triangle.
///
/// `corners` runs parallel to `triangles`. Each unordered pair is tested in
/// both orders and both members are flagged on a hit.
pub fn flag_overlaps(triangles: &[TriangleUv], corners: &[[u32; 3]]) -> Vec<bool> {
    let count = triangles.len().min(corners.len());
    let mut flags = vec![false; count];
    for i in 0..count {
        let first = IndexedTriangle {
            triangle: &triangles[i],
            corners: corners[i],
        };
        for j in (i + 1)..count {
            if flags[i] && flags[j] {
                continue;
            }
            let second = IndexedTriangle {
                triangle: &triangles[j],
                corners: corners[j],
            };
            if triangles_overlap(first, second) || triangles_overlap(second, first) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    flags
}
