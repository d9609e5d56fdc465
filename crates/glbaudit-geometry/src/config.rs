//! Engine configuration: which topologies to build and how wide gutters must be.

use serde::{Deserialize, Serialize};

/// Texture resolutions a gutter width can be specified for.
pub const GUTTER_RESOLUTIONS: [u32; 5] = [256, 512, 1024, 2048, 4096];

/// Selects the optional topologies built for each primitive.
///
/// Without `xyz` no edges or hard/non-manifold counts are produced; without
/// `uv` there are no islands, overlap flags or gutter checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexRequirements {
    pub xyz: bool,
    pub uv: bool,
}

impl IndexRequirements {
    pub const NONE: Self = Self { xyz: false, uv: false };
    pub const ALL: Self = Self { xyz: true, uv: true };
}

/// Required gutter width in pixels, keyed by texture resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GutterWidths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution256: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution512: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution1024: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution2048: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution4096: Option<f64>,
}

impl GutterWidths {
    /// Width configured for `resolution`, if any.
    pub fn width_for(&self, resolution: u32) -> Option<f64> {
        match resolution {
            256 => self.resolution256,
            512 => self.resolution512,
            1024 => self.resolution1024,
            2048 => self.resolution2048,
            4096 => self.resolution4096,
            _ => None,
        }
    }

    /// Grid resolution for the gutter check.
    ///
    /// Each positive width `w` at texture resolution `R` asks for a grid of
    /// `R / w` cells; the coarsest (most demanding) one wins. Fractional
    /// results round up. `None` when no positive width is configured.
    pub fn effective_resolution(&self) -> Option<u32> {
        GUTTER_RESOLUTIONS
            .iter()
            .filter_map(|&res| {
                let width = self.width_for(res)?;
                (width > 0.0 && width.is_finite()).then(|| f64::from(res) / width)
            })
            .min_by(f64::total_cmp)
            .map(|grid| grid.ceil().min(f64::from(u32::MAX)) as u32)
    }
}
