//! Audit schema: which geometry requirements a model must meet.
//!
//! Read from the `model`, `product` and `uvs` sections of a schema JSON file.
//! Every key is optional; a missing key disables its check.

use std::path::Path;

use glbaudit_geometry::{GutterWidths, IndexRequirements};
use serde::{Deserialize, Serialize};

use crate::rules::LintError;

/// Inclusive `minimum..=maximum` bounds on a measured value.
///
/// Negative bounds are treated as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ValueRange {
    pub fn min_bound(&self) -> Option<f64> {
        self.minimum.filter(|v| *v >= 0.0)
    }

    pub fn max_bound(&self) -> Option<f64> {
        self.maximum.filter(|v| *v >= 0.0)
    }

    pub fn is_set(&self) -> bool {
        self.min_bound().is_some() || self.max_bound().is_some()
    }

    /// `"{value} > {max}"` or `"{value} < {min}"` when `value` is out of range.
    pub fn violation(&self, value: f64, precision: usize) -> Option<String> {
        if let Some(max) = self.max_bound().filter(|max| value > *max) {
            return Some(format!("{:.*} > {}", precision, value, max));
        }
        if let Some(min) = self.min_bound().filter(|min| value < *min) {
            return Some(format!("{:.*} < {}", precision, value, min));
        }
        None
    }

    /// Human-readable form of the configured bounds.
    pub fn describe(&self) -> String {
        match (self.min_bound(), self.max_bound()) {
            (Some(min), Some(max)) => format!("{} - {}", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, Some(max)) => format!("<= {}", max),
            (None, None) => "any".to_string(),
        }
    }
}

/// Bounds on how many objects of each kind the model holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectCount {
    pub primitives: ValueRange,
}

/// Requirements on the XYZ mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelRequirements {
    pub object_count: ObjectCount,
    pub require_manifold_edges: bool,
    pub require_beveled_edges: bool,
    pub triangles: ValueRange,
}

/// Bounds on the model's extents in meters.
///
/// Length is measured along X, height along Y and width along Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub height: ValueRange,
    pub length: ValueRange,
    pub width: ValueRange,
}

impl Dimensions {
    pub fn is_set(&self) -> bool {
        self.height.is_set() || self.length.is_set() || self.width.is_set()
    }
}

/// Requirements on the physical product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRequirements {
    pub dimensions: Dimensions,
}

/// Requirements on the texture-space layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UvRequirements {
    pub gutter_width: GutterWidths,
    pub require_not_inverted: bool,
    pub require_not_overlapping: bool,
    pub require_range_zero_to_one: bool,
    pub pixels_per_meter: ValueRange,
}

/// Geometry subset of an asset schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSchema {
    pub model: ModelRequirements,
    pub product: ProductRequirements,
    pub uvs: UvRequirements,
}

impl AuditSchema {
    /// Parses a schema from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LintError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a schema file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Grid size for the gutter check, if any gutter width is set.
    pub fn margin_resolution(&self) -> Option<u32> {
        self.uvs.gutter_width.effective_resolution()
    }

    /// Which vertex indices the engine has to build for this schema.
    pub fn index_requirements(&self) -> IndexRequirements {
        IndexRequirements {
            xyz: self.model.require_manifold_edges || self.model.require_beveled_edges,
            uv: self.uvs.require_not_overlapping || self.margin_resolution().is_some(),
        }
    }
}
