//! Gutter check.
//!
//! UV space is divided into an `R x R` grid. Each triangle claims every cell
//! it touches, with cells drawn at twice the pixel pitch so that islands
//! closer than about one pixel share a cell. A cell claimed by two islands
//! means the gutter is too narrow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, GeometryResult};
use crate::predicates::Point2;
use crate::triangle::TriangleUv;

/// Largest grid accepted by the gutter check, a quarter-pixel gutter on a
/// 4096 texture.
pub const MAX_MARGIN_RESOLUTION: u32 = 16384;

/// An axis-aligned square in UV space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareUv {
    pub center: Point2,
    pub size: f64,
    pub min: Point2,
    pub max: Point2,
}

impl SquareUv {
    pub fn new(center: Point2, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            center,
            size,
            min: [center[0] - half, center[1] - half],
            max: [center[0] + half, center[1] + half],
        }
    }

    /// Strict interior containment.
    pub fn contains_point(&self, point: Point2) -> bool {
        point[0] > self.min[0] && point[0] < self.max[0] && point[1] > self.min[1] && point[1] < self.max[1]
    }

    pub fn overlaps_triangle(&self, triangle: &TriangleUv) -> bool {
        let b = &triangle.bounds;
        if b.min_u >= self.max[0] || b.max_u <= self.min[0] || b.min_v >= self.max[1] || b.max_v <= self.min[1] {
            return false;
        }
        if triangle.points.iter().any(|p| self.contains_point(*p)) {
            return true;
        }

        let bottom_left = self.min;
        let bottom_right = [self.max[0], self.min[1]];
        let top_left = [self.min[0], self.max[1]];
        let top_right = self.max;
        triangle.intersects_segment(bottom_left, bottom_right)
            || triangle.intersects_segment(bottom_right, top_right)
            || triangle.intersects_segment(top_right, top_left)
            || triangle.intersects_segment(top_left, bottom_left)
    }
}

/// Two islands claiming the same grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginCollision {
    /// Cell column (U) and row (V).
    pub cell: (u32, u32),
    /// Island that claimed the cell first.
    pub owner: u32,
    /// Island that collided with it.
    pub intruder: u32,
}

/// Half-open cell range covering `[low, high]` at `resolution` cells per unit.
fn cell_range(low: f64, high: f64, resolution: u32) -> (u32, u32) {
    let res = f64::from(resolution);
    let start = (low * res).floor().clamp(0.0, res) as u32;
    let end = (high * res).ceil().clamp(0.0, res) as u32;
    (start, end)
}

/// Rasterizes `triangles` and returns the first cell claimed by two islands.
///
/// `triangle_islands` runs parallel to `triangles`. Cells outside the unit
/// square are never tested. Only claimed cells are stored.
pub fn find_margin_collision(
    triangles: &[TriangleUv],
    triangle_islands: &[u32],
    resolution: u32,
) -> GeometryResult<Option<MarginCollision>> {
    if resolution == 0 || resolution > MAX_MARGIN_RESOLUTION {
        return Err(GeometryError::InvalidResolution { resolution });
    }

    let pitch = 1.0 / f64::from(resolution);
    let half = pitch / 2.0;
    let mut cells: HashMap<(u32, u32), u32> = HashMap::new();

    for (triangle, &island) in triangles.iter().zip(triangle_islands) {
        let bounds = &triangle.bounds;
        let (u_start, u_end) = cell_range(bounds.min_u - half, bounds.max_u + half, resolution);
        let (v_start, v_end) = cell_range(bounds.min_v - half, bounds.max_v + half, resolution);

        for i in u_start..u_end {
            for j in v_start..v_end {
                let center = [f64::from(i) * pitch + half, f64::from(j) * pitch + half];
                let cell = SquareUv::new(center, pitch * 2.0);
                if !cell.overlaps_triangle(triangle) {
                    continue;
                }

                match cells.get(&(i, j)) {
                    None => {
                        cells.insert((i, j), island);
                    }
                    Some(&owner) if owner != island => {
                        debug!(cell_u = i, cell_v = j, owner, intruder = island, resolution, "margin collision");
                        return Ok(Some(MarginCollision {
                            cell: (i, j),
                            owner,
                            intruder: island,
                        }));
                    }
                    Some(_) => {}
                }
            }
        }
    }

    Ok(None)
}

/// True when no grid cell at `resolution` is shared by two islands.
pub fn has_enough_margin(
    triangles: &[TriangleUv],
    triangle_islands: &[u32],
    resolution: u32,
) -> GeometryResult<bool> {
    Ok(find_margin_collision(triangles, triangle_islands, resolution)?.is_none())
}
