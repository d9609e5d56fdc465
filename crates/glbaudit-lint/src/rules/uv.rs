//! Texture-space rules: inversion, overlap, range, gutter and texel density.

use glbaudit_geometry::{pixels_per_meter, UvBounds, UvLayout};
use tracing::debug;

use crate::report::{LintIssue, Severity};
use crate::rules::{AuditContext, GeometryRule};

pub fn all_rules() -> Vec<Box<dyn GeometryRule>> {
    vec![
        Box::new(InvertedRule),
        Box::new(OverlapRule),
        Box::new(RangeRule),
        Box::new(GutterRule),
        Box::new(TexelDensityRule),
    ]
}

fn format_extents(e: &UvBounds) -> String {
    format!("u [{:.4}, {:.4}], v [{:.4}, {:.4}]", e.min_u, e.max_u, e.min_v, e.max_v)
}

/// Rule 3: Inverted UVs
///
/// Detection: UV triangle wound counter-clockwise
pub struct InvertedRule;

impl GeometryRule for InvertedRule {
    fn id(&self) -> &'static str {
        "uv/inverted"
    }

    fn description(&self) -> &'static str {
        "Detects UV triangles with flipped winding"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        if !ctx.schema.uvs.require_not_inverted {
            return vec![];
        }
        let mut issues = Vec::new();
        let mut any_uvs = false;
        for prim in &ctx.geometry.primitives {
            let Some(uv) = &prim.uv else { continue };
            any_uvs = true;
            let n = uv.inverted_count();
            if n > 0 {
                issues.push(
                    LintIssue::new(
                        self.id(),
                        self.default_severity(),
                        format!("{} inverted UV triangles", n),
                        "Flip the affected UV islands so they are not mirrored",
                    )
                    .with_asset_location(prim.name.clone())
                    .with_schema_path("uvs.requireNotInverted")
                    .with_actual_value(n.to_string())
                    .with_expected_range("0"),
                );
            }
        }
        if !any_uvs {
            issues.push(LintIssue::not_computed(self.id(), "model has no UV coordinates"));
        }
        issues
    }
}

/// Rule 4: Overlapping UVs
///
/// Detection: UV triangles sharing area with another triangle
pub struct OverlapRule;

impl GeometryRule for OverlapRule {
    fn id(&self) -> &'static str {
        "uv/overlap"
    }

    fn description(&self) -> &'static str {
        "Detects UV triangles that overlap each other"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        if !ctx.schema.uvs.require_not_overlapping {
            return vec![];
        }
        let mut issues = Vec::new();
        let mut any_topology = false;
        for prim in &ctx.geometry.primitives {
            let Some(topology) = prim.uv.as_ref().and_then(|uv| uv.topology.as_ref()) else {
                continue;
            };
            any_topology = true;
            let n = topology.overlapping_count();
            if n > 0 {
                issues.push(
                    LintIssue::new(
                        self.id(),
                        self.default_severity(),
                        format!("{} overlapping UV triangles", n),
                        "Separate overlapping UV islands or move mirrored copies outside the 0-1 range",
                    )
                    .with_asset_location(prim.name.clone())
                    .with_schema_path("uvs.requireNotOverlapping")
                    .with_actual_value(n.to_string())
                    .with_expected_range("0"),
                );
            }
        }
        if !any_topology {
            issues.push(LintIssue::not_computed(self.id(), "UV topology"));
        }
        issues
    }
}

/// Rule 5: UV range
///
/// Detection: any UV coordinate outside [0, 1]
pub struct RangeRule;

impl GeometryRule for RangeRule {
    fn id(&self) -> &'static str {
        "uv/range"
    }

    fn description(&self) -> &'static str {
        "Detects UV coordinates outside the 0-1 range"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        if !ctx.schema.uvs.require_range_zero_to_one {
            return vec![];
        }
        match ctx.summary.uvs_in_range_zero_to_one {
            None => vec![LintIssue::not_computed(self.id(), "model has no UV coordinates")],
            Some(true) => vec![],
            Some(false) => ctx
                .geometry
                .primitives
                .iter()
                .filter_map(|prim| {
                    let uv = prim.uv.as_ref().filter(|uv| !uv.is_in_range_zero_to_one())?;
                    let extents = uv.extents.as_ref().map(format_extents).unwrap_or_default();
                    Some(
                        LintIssue::new(
                            self.id(),
                            self.default_severity(),
                            "UVs outside the 0-1 range",
                            "Scale or move UV islands into the 0-1 square",
                        )
                        .with_asset_location(prim.name.clone())
                        .with_schema_path("uvs.requireRangeZeroToOne")
                        .with_actual_value(extents)
                        .with_expected_range("u [0, 1], v [0, 1]"),
                    )
                })
                .collect(),
        }
    }
}

/// Rule 6: Gutter width
///
/// Detection: two UV islands touching the same cell of the margin grid
pub struct GutterRule;

impl GutterRule {
    fn collision_issue(&self, prim_name: &str, uv: &UvLayout, resolution: u32) -> Option<LintIssue> {
        let issue = match uv.margin_collision(resolution) {
            Ok(Some(Some(collision))) => LintIssue::new(
                self.id(),
                self.default_severity(),
                format!("Pixel collision between UV islands at {0}x{0}", resolution),
                "Increase the spacing between UV islands",
            )
            .with_actual_value(format!(
                "islands {} and {} share cell ({}, {})",
                collision.owner, collision.intruder, collision.cell.0, collision.cell.1
            )),
            Ok(_) => return None,
            Err(e) => LintIssue::new(
                self.id(),
                self.default_severity(),
                format!("Gutter check failed: {} [{}]", e, e.code()),
                "Check the gutterWidth values in the schema",
            ),
        };
        Some(
            issue
                .with_asset_location(prim_name)
                .with_schema_path("uvs.gutterWidth")
                .with_expected_range(format!("no shared cells at {0}x{0}", resolution)),
        )
    }
}

impl GeometryRule for GutterRule {
    fn id(&self) -> &'static str {
        "uv/gutter"
    }

    fn description(&self) -> &'static str {
        "Detects UV islands packed closer than the required gutter width"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        let Some(resolution) = ctx.schema.margin_resolution() else {
            return vec![];
        };
        let mut any_topology = false;
        for prim in &ctx.geometry.primitives {
            let Some(uv) = prim.uv.as_ref().filter(|uv| uv.topology.is_some()) else {
                continue;
            };
            any_topology = true;
            if let Some(issue) = self.collision_issue(&prim.name, uv, resolution) {
                debug!(primitive = %prim.name, resolution, "gutter rule failed");
                return vec![issue];
            }
        }
        if !any_topology {
            return vec![LintIssue::not_computed(self.id(), "UV islands")];
        }
        vec![]
    }
}

/// Rule 7: Texel density
///
/// Detection: pixels per meter, from UV density and texture size, outside the schema bounds
pub struct TexelDensityRule;

impl GeometryRule for TexelDensityRule {
    fn id(&self) -> &'static str {
        "uv/texel-density"
    }

    fn description(&self) -> &'static str {
        "Checks texel density in pixels per meter against minimum and maximum bounds"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        let bounds = ctx.schema.uvs.pixels_per_meter;
        if !bounds.is_set() {
            return vec![];
        }
        let widths = ctx.textures.iter().map(|t| t.width);
        let heights = ctx.textures.iter().map(|t| t.height);
        let (Some(max_w), Some(max_h), Some(min_w), Some(min_h)) =
            (widths.clone().max(), heights.clone().max(), widths.min(), heights.min())
        else {
            return vec![LintIssue::new(
                self.id(),
                Severity::Info,
                "No Images",
                "Supply texture sizes to check texel density",
            )];
        };
        let (Some(density_min), Some(density_max)) = (ctx.summary.density_min, ctx.summary.density_max) else {
            return vec![LintIssue::not_computed(self.id(), "UV density")];
        };

        let mut issues = Vec::new();
        if let Some(maximum) = bounds.max_bound() {
            let highest = pixels_per_meter(density_max, max_w, max_h);
            if highest > maximum {
                issues.push(
                    LintIssue::new(
                        self.id(),
                        self.default_severity(),
                        format!("{:.2} > {}", highest, maximum),
                        "Reduce texture resolution or shrink the densest UV islands",
                    )
                    .with_schema_path("uvs.pixelsPerMeter.maximum")
                    .with_actual_value(format!("{:.2}", highest))
                    .with_expected_range(format!("<= {}", maximum)),
                );
            }
        }
        if let Some(minimum) = bounds.min_bound() {
            let lowest = pixels_per_meter(density_min, min_w, min_h);
            if lowest < minimum {
                issues.push(
                    LintIssue::new(
                        self.id(),
                        self.default_severity(),
                        format!("{:.2} < {}", lowest, minimum),
                        "Increase texture resolution or enlarge the sparsest UV islands",
                    )
                    .with_schema_path("uvs.pixelsPerMeter.minimum")
                    .with_actual_value(format!("{:.2}", lowest))
                    .with_expected_range(format!(">= {}", minimum)),
                );
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TextureSize;
    use crate::schema::AuditSchema;
    use glbaudit_geometry::{IndexRequirements, ModelGeometry, PrimitiveBuffers};
    use pretty_assertions::assert_eq;

    /// Unit square in XYZ; each quad gets its own UV rectangle.
    fn quads(name: &str, rects: &[([f32; 2], [f32; 2])]) -> PrimitiveBuffers {
        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        let mut indices = Vec::new();
        for (i, (min, max)) in rects.iter().enumerate() {
            let base = (i * 4) as u32;
            positions.extend_from_slice(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
            uvs.extend_from_slice(&[min[0], min[1], max[0], min[1], max[0], max[1], min[0], max[1]]);
            // clockwise in UV space
            indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
        PrimitiveBuffers {
            name: name.to_string(),
            positions,
            uvs: Some(uvs),
            indices,
        }
    }

    fn build(buffers: PrimitiveBuffers, schema: &AuditSchema) -> ModelGeometry {
        ModelGeometry::build(&[buffers], schema.index_requirements()).unwrap()
    }

    #[test]
    fn test_clean_layout_passes_everything() {
        let schema = AuditSchema::from_json(
            r#"{ "uvs": { "requireNotInverted": true, "requireNotOverlapping": true,
                          "requireRangeZeroToOne": true, "gutterWidth": { "resolution256": 4 } } }"#,
        )
        .unwrap();
        let model = build(quads("clean", &[([0.05, 0.05], [0.45, 0.95]), ([0.55, 0.05], [0.95, 0.95])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        for rule in all_rules() {
            assert!(rule.check(&ctx).is_empty(), "{} reported issues", rule.id());
        }
    }

    #[test]
    fn test_inverted_triangles() {
        let mut buffers = quads("mirrored", &[([0.0, 0.0], [1.0, 1.0])]);
        buffers.indices = vec![0, 1, 2, 0, 2, 3];
        let schema = AuditSchema::from_json(r#"{ "uvs": { "requireNotInverted": true } }"#).unwrap();
        let model = build(buffers, &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = InvertedRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "2 inverted UV triangles");
    }

    #[test]
    fn test_overlapping_quads() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "requireNotOverlapping": true } }"#).unwrap();
        let model = build(quads("stacked", &[([0.1, 0.1], [0.6, 0.6]), ([0.3, 0.3], [0.9, 0.9])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = OverlapRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].asset_location.as_deref(), Some("stacked"));
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_out_of_range() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "requireRangeZeroToOne": true } }"#).unwrap();
        let model = build(quads("tiled", &[([0.0, 0.0], [2.0, 1.0])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = RangeRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].actual_value.as_deref(),
            Some("u [0.0000, 2.0000], v [0.0000, 1.0000]")
        );
    }

    #[test]
    fn test_narrow_gutter() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "gutterWidth": { "resolution256": 64 } } }"#).unwrap();
        assert_eq!(schema.margin_resolution(), Some(4));
        let model = build(quads("tight", &[([0.05, 0.05], [0.45, 0.95]), ([0.55, 0.05], [0.95, 0.95])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = GutterRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Pixel collision between UV islands at 4x4");
    }

    #[test]
    fn test_sub_pixel_gutter_is_reported() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "gutterWidth": { "resolution4096": 0.001 } } }"#).unwrap();
        assert!(schema.margin_resolution().is_some_and(|r| r > 4_000_000));
        let model = build(quads("fine", &[([0.05, 0.05], [0.45, 0.95])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = GutterRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.ends_with("[GEOM_005]"), "{}", issues[0].message);
    }

    #[test]
    fn test_gutter_without_topology() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "gutterWidth": { "resolution256": 4 } } }"#).unwrap();
        let buffers = quads("q", &[([0.0, 0.0], [1.0, 1.0])]);
        let model = ModelGeometry::build(&[buffers], IndexRequirements::NONE).unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = GutterRule.check(&ctx);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_texel_density_without_images() {
        let schema = AuditSchema::from_json(r#"{ "uvs": { "pixelsPerMeter": { "maximum": 10 } } }"#).unwrap();
        let model = build(quads("q", &[([0.0, 0.0], [1.0, 1.0])]), &schema);
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = TexelDensityRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "No Images");
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_texel_density_bounds() {
        // UV area 0.25 over model area 1.0 on a 4x4 texture: 4 pixels per meter
        let buffers = quads("q", &[([0.0, 0.0], [0.5, 0.5])]);
        let textures = [TextureSize::new(4, 4)];

        let within = AuditSchema::from_json(r#"{ "uvs": { "pixelsPerMeter": { "minimum": 2, "maximum": 8 } } }"#).unwrap();
        let model = build(buffers.clone(), &within);
        let ctx = AuditContext::new(&within, &model, &textures);
        assert!(TexelDensityRule.check(&ctx).is_empty());

        let too_sparse = AuditSchema::from_json(r#"{ "uvs": { "pixelsPerMeter": { "minimum": 5 } } }"#).unwrap();
        let ctx = AuditContext::new(&too_sparse, &model, &textures);
        let issues = TexelDensityRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "4.00 < 5");

        let too_dense = AuditSchema::from_json(r#"{ "uvs": { "pixelsPerMeter": { "maximum": 3, "minimum": -1 } } }"#).unwrap();
        let ctx = AuditContext::new(&too_dense, &model, &textures);
        let issues = TexelDensityRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "4.00 > 3");
    }
}
