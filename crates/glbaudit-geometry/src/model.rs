//! Model-level aggregation across primitives.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::IndexRequirements;
use crate::error::GeometryResult;
use crate::primitive::{Primitive, PrimitiveBuffers};
use crate::triangle::{UvBounds, XyzBounds};

/// Texture pixels covering one square meter of surface at `density`
/// (UV area per model area) for a `width x height` texture.
pub fn pixels_per_meter(density: f64, width: u32, height: u32) -> f64 {
    density * f64::from(width) * f64::from(height)
}

/// Totals over every primitive of a model.
///
/// Each count is `None` when no primitive could produce it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometrySummary {
    pub primitive_count: usize,
    pub triangle_count: usize,
    pub hard_edge_count: Option<usize>,
    pub non_manifold_edge_count: Option<usize>,
    pub inverted_triangle_count: Option<usize>,
    pub overlapping_triangle_count: Option<usize>,
    pub island_count: Option<usize>,
    pub density_min: Option<f64>,
    pub density_max: Option<f64>,
    /// UV extents merged over every primitive.
    pub uv_extents: Option<UvBounds>,
    /// Whether every UV coordinate of every primitive lies in `[0, 1]`.
    pub uvs_in_range_zero_to_one: Option<bool>,
    /// Model-space extents merged over every primitive.
    pub bounds: Option<XyzBounds>,
}

fn add(total: Option<usize>, value: Option<usize>) -> Option<usize> {
    match (total, value) {
        (Some(t), Some(v)) => Some(t + v),
        (t, v) => t.or(v),
    }
}

fn extreme(current: Option<f64>, value: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (current, value) {
        (Some(c), Some(v)) => Some(pick(c, v)),
        (c, v) => c.or(v),
    }
}

/// Every primitive of a model, built with the same index requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGeometry {
    pub primitives: Vec<Primitive>,
}

impl ModelGeometry {
    /// Builds all primitives in parallel, keeping their input order.
    ///
    /// Fails with the error of the first failing primitive in input order.
    pub fn build(buffers: &[PrimitiveBuffers], requirements: IndexRequirements) -> GeometryResult<Self> {
        let built: Vec<GeometryResult<Primitive>> = buffers
            .par_iter()
            .map(|b| Primitive::build(b, requirements))
            .collect();
        let primitives = built.into_iter().collect::<GeometryResult<Vec<_>>>()?;

        info!(
            primitives = primitives.len(),
            xyz = requirements.xyz,
            uv = requirements.uv,
            "built model geometry"
        );
        Ok(Self { primitives })
    }

    pub fn summary(&self) -> GeometrySummary {
        let mut summary = GeometrySummary {
            primitive_count: self.primitives.len(),
            ..Default::default()
        };
        for prim in &self.primitives {
            let stats = &prim.stats;
            summary.triangle_count += stats.triangle_count;
            summary.hard_edge_count = add(summary.hard_edge_count, stats.hard_edge_count);
            summary.non_manifold_edge_count = add(summary.non_manifold_edge_count, stats.non_manifold_edge_count);
            summary.inverted_triangle_count = add(summary.inverted_triangle_count, stats.inverted_triangle_count);
            summary.overlapping_triangle_count =
                add(summary.overlapping_triangle_count, stats.overlapping_triangle_count);
            summary.island_count = add(summary.island_count, stats.island_count);
            summary.density_min = extreme(summary.density_min, stats.density_min, f64::min);
            summary.density_max = extreme(summary.density_max, stats.density_max, f64::max);
            summary.bounds = match (summary.bounds, stats.bounds) {
                (Some(total), Some(bounds)) => Some(total.union(bounds)),
                (total, bounds) => total.or(bounds),
            };

            if let Some(uv) = &prim.uv {
                summary.uv_extents = match (summary.uv_extents, uv.extents) {
                    (Some(total), Some(extents)) => Some(total.union(extents)),
                    (total, extents) => total.or(extents),
                };
                let in_range = uv.is_in_range_zero_to_one();
                summary.uvs_in_range_zero_to_one = Some(summary.uvs_in_range_zero_to_one.unwrap_or(true) && in_range);
            }
        }
        summary
    }

    /// Gutter check over every primitive with a UV topology, stopping at
    /// the first primitive that fails.
    ///
    /// `None` when no primitive has one. Islands of different primitives
    /// are never compared with each other.
    pub fn has_enough_margin(&self, resolution: u32) -> GeometryResult<Option<bool>> {
        let mut result = None;
        for prim in &self.primitives {
            let Some(uv) = &prim.uv else { continue };
            match uv.has_enough_margin(resolution)? {
                Some(false) => {
                    debug!(primitive = %prim.name, resolution, "gutter check failed");
                    return Ok(Some(false));
                }
                Some(true) => result = Some(true),
                None => {}
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use pretty_assertions::assert_eq;

    fn triangle(name: &str, offset: f32) -> PrimitiveBuffers {
        PrimitiveBuffers {
            name: name.to_string(),
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            uvs: Some(vec![offset, 0.0, offset + 0.25, 0.0, offset, 0.25]),
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_pixels_per_meter() {
        assert_eq!(pixels_per_meter(0.5, 1024, 512), 262_144.0);
        assert_eq!(pixels_per_meter(0.0, 1024, 1024), 0.0);
    }

    #[test]
    fn test_build_preserves_order() {
        let buffers: Vec<_> = (0..16).map(|i| triangle(&format!("p{}", i), 0.0)).collect();
        let model = ModelGeometry::build(&buffers, IndexRequirements::NONE).unwrap();
        let names: Vec<_> = model.primitives.iter().map(|p| p.name.clone()).collect();
        let expected: Vec<_> = (0..16).map(|i| format!("p{}", i)).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_build_reports_first_failure() {
        let mut buffers: Vec<_> = (0..4).map(|i| triangle(&format!("p{}", i), 0.0)).collect();
        buffers[1].positions.clear();
        buffers[3].positions.clear();
        let err = ModelGeometry::build(&buffers, IndexRequirements::NONE).unwrap_err();
        assert_eq!(
            err,
            GeometryError::NoPositionData {
                mesh: "p1".to_string()
            }
        );
    }

    #[test]
    fn test_summary_sums_counts() {
        let buffers = vec![triangle("a", 0.0), triangle("b", 0.9)];
        let model = ModelGeometry::build(&buffers, IndexRequirements::ALL).unwrap();
        let summary = model.summary();
        assert_eq!(summary.primitive_count, 2);
        assert_eq!(summary.triangle_count, 2);
        assert_eq!(summary.hard_edge_count, Some(0));
        assert_eq!(summary.island_count, Some(2));
        assert_eq!(summary.uvs_in_range_zero_to_one, Some(false));
        let max_u = summary.uv_extents.map(|e| e.max_u);
        assert!(max_u.is_some_and(|u| (u - 1.15).abs() < 1e-6));
        assert_eq!(summary.bounds.map(|b| b.size()), Some([1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_summary_without_indexing() {
        let model = ModelGeometry::build(&[triangle("a", 0.0)], IndexRequirements::NONE).unwrap();
        let summary = model.summary();
        assert_eq!(summary.hard_edge_count, None);
        assert_eq!(summary.island_count, None);
        assert_eq!(summary.uvs_in_range_zero_to_one, Some(true));
        assert_eq!(model.has_enough_margin(16), Ok(None));
    }

    #[test]
    fn test_margin_is_per_primitive() {
        // identical UVs in two primitives never collide with each other
        let buffers = vec![triangle("a", 0.0), triangle("b", 0.0)];
        let model = ModelGeometry::build(&buffers, IndexRequirements::ALL).unwrap();
        assert_eq!(model.has_enough_margin(64), Ok(Some(true)));
    }
}
