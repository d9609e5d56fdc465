//! Triangle models for XYZ faces and their UV projections.

use serde::{Deserialize, Serialize};

use crate::predicates::{
    cross3, distance2, distance3, heron_area, is_counter_clockwise, normalize3, point_in_triangle,
    segments_intersect, sub3, Point2, Vec3,
};

/// A face in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleXyz {
    /// Position of this face in its primitive's index list.
    pub id: u32,
    pub positions: [Vec3; 3],
    pub area: f64,
    /// Unit normal from `(B - A) x (C - A)`; `None` for degenerate faces.
    pub normal: Option<Vec3>,
}

impl TriangleXyz {
    pub fn new(id: u32, positions: [Vec3; 3]) -> Self {
        let [a, b, c] = positions;
        let area = heron_area(distance3(a, b), distance3(b, c), distance3(c, a));
        let normal = normalize3(cross3(sub3(b, a), sub3(c, a)));
        Self {
            id,
            positions,
            area,
            normal,
        }
    }
}

/// Axis-aligned extents in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyzBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl XyzBounds {
    /// Extents of every corner of `triangles`; unreferenced vertices are ignored.
    pub fn of_triangles(triangles: &[TriangleXyz]) -> Option<Self> {
        let mut corners = triangles.iter().flat_map(|t| t.positions);
        let first = corners.next()?;
        let start = Self { min: first, max: first };
        Some(corners.fold(start, |bounds, p| bounds.union(Self { min: p, max: p })))
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: std::array::from_fn(|i| self.min[i].min(other.min[i])),
            max: std::array::from_fn(|i| self.max[i].max(other.max[i])),
        }
    }

    /// Size along X, Y and Z.
    pub fn size(&self) -> Vec3 {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }
}

/// Axis-aligned extents in UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvBounds {
    pub min_u: f64,
    pub max_u: f64,
    pub min_v: f64,
    pub max_v: f64,
}

impl UvBounds {
    pub fn of_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min_u: first[0],
            max_u: first[0],
            min_v: first[1],
            max_v: first[1],
        };
        for p in rest {
            bounds.min_u = bounds.min_u.min(p[0]);
            bounds.max_u = bounds.max_u.max(p[0]);
            bounds.min_v = bounds.min_v.min(p[1]);
            bounds.max_v = bounds.max_v.max(p[1]);
        }
        Some(bounds)
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_u: self.min_u.min(other.min_u),
            max_u: self.max_u.max(other.max_u),
            min_v: self.min_v.min(other.min_v),
            max_v: self.max_v.max(other.max_v),
        }
    }

    /// Open-interval overlap: boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.min_u >= other.max_u
            || self.max_u <= other.min_u
            || self.min_v >= other.max_v
            || self.max_v <= other.min_v)
    }

    /// Inclusive containment in `[0, 1] x [0, 1]`.
    pub fn is_within_unit_square(&self) -> bool {
        self.min_u >= 0.0 && self.max_u <= 1.0 && self.min_v >= 0.0 && self.max_v <= 1.0
    }
}

/// A face in texture space.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleUv {
    /// Same id as the XYZ face this projects.
    pub id: u32,
    pub points: [Point2; 3],
    pub area: f64,
    /// True when `A -> B -> C` winds counter-clockwise in UV space.
    pub inverted: bool,
    pub bounds: UvBounds,
}

impl TriangleUv {
    pub fn new(id: u32, points: [Point2; 3]) -> Self {
        let [a, b, c] = points;
        let area = heron_area(distance2(a, b), distance2(b, c), distance2(c, a));
        let bounds = UvBounds {
            min_u: a[0].min(b[0]).min(c[0]),
            max_u: a[0].max(b[0]).max(c[0]),
            min_v: a[1].min(b[1]).min(c[1]),
            max_v: a[1].max(b[1]).max(c[1]),
        };
        Self {
            id,
            points,
            area,
            inverted: is_counter_clockwise(a, b, c),
            bounds,
        }
    }

    pub fn has_area(&self) -> bool {
        self.area > 0.0
    }

    pub fn contains_point(&self, point: Point2) -> bool {
        let [a, b, c] = self.points;
        point_in_triangle(point, a, b, c)
    }

    /// True when segment `p1-p2` crosses any of this triangle's edges.
    pub fn intersects_segment(&self, p1: Point2, p2: Point2) -> bool {
        let [a, b, c] = self.points;
        segments_intersect(a, b, p1, p2)
            || segments_intersect(b, c, p1, p2)
            || segments_intersect(c, a, p1, p2)
    }
}
