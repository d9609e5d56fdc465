//! Whole-model rules: triangle and primitive counts, overall dimensions.

use crate::report::{LintIssue, Severity};
use crate::rules::{AuditContext, GeometryRule};
use crate::schema::ValueRange;

pub fn all_rules() -> Vec<Box<dyn GeometryRule>> {
    vec![
        Box::new(TriangleCountRule),
        Box::new(PrimitiveCountRule),
        Box::new(DimensionsRule),
    ]
}

/// One issue when `count` falls outside `range`.
fn count_issue(
    rule: &dyn GeometryRule,
    what: &str,
    count: usize,
    range: &ValueRange,
    schema_path: &str,
) -> Vec<LintIssue> {
    let Some(violation) = range.violation(count as f64, 0) else {
        return vec![];
    };
    vec![LintIssue::new(
        rule.id(),
        rule.default_severity(),
        format!("{} {}", what, violation),
        format!("Bring the {} within {}", what.to_lowercase(), range.describe()),
    )
    .with_schema_path(schema_path)
    .with_actual_value(count.to_string())
    .with_expected_range(range.describe())]
}

/// Rule 8: Triangle count
///
/// Detection: total triangles over all primitives outside `model.triangles`
pub struct TriangleCountRule;

impl GeometryRule for TriangleCountRule {
    fn id(&self) -> &'static str {
        "model/triangle-count"
    }

    fn description(&self) -> &'static str {
        "Checks the total triangle count against minimum and maximum bounds"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        count_issue(
            self,
            "Triangle count",
            ctx.summary.triangle_count,
            &ctx.schema.model.triangles,
            "model.triangles",
        )
    }
}

/// Rule 9: Primitive count
///
/// Detection: number of mesh primitives outside `model.objectCount.primitives`
pub struct PrimitiveCountRule;

impl GeometryRule for PrimitiveCountRule {
    fn id(&self) -> &'static str {
        "model/primitive-count"
    }

    fn description(&self) -> &'static str {
        "Checks the number of mesh primitives (draw calls) against minimum and maximum bounds"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        count_issue(
            self,
            "Primitive count",
            ctx.summary.primitive_count,
            &ctx.schema.model.object_count.primitives,
            "model.objectCount.primitives",
        )
    }
}

/// Rule 10: Dimensions
///
/// Detection: bounding box size outside `product.dimensions`. Length is X,
/// height is Y, width is Z; node transforms are not applied.
pub struct DimensionsRule;

fn micrometers(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

impl GeometryRule for DimensionsRule {
    fn id(&self) -> &'static str {
        "model/dimensions"
    }

    fn description(&self) -> &'static str {
        "Checks the model's bounding box against minimum and maximum dimensions"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        let dimensions = &ctx.schema.product.dimensions;
        if !dimensions.is_set() {
            return vec![];
        }
        let Some(bounds) = ctx.summary.bounds else {
            return vec![LintIssue::not_computed(self.id(), "model bounds")];
        };
        let [length, height, width] = bounds.size().map(micrometers);

        let mut failing = Vec::new();
        for (name, value, range) in [
            ("Height", height, &dimensions.height),
            ("Length", length, &dimensions.length),
            ("Width", width, &dimensions.width),
        ] {
            if let Some(max) = range.max_bound() {
                if value > max {
                    failing.push(format!("{} too big", name));
                }
            }
            if let Some(min) = range.min_bound() {
                if value < min {
                    failing.push(format!("{} too small", name));
                }
            }
        }
        if failing.is_empty() {
            return vec![];
        }

        vec![LintIssue::new(
            self.id(),
            self.default_severity(),
            failing.join("; "),
            "Rescale the model to the product's real-world size in meters",
        )
        .with_schema_path("product.dimensions")
        .with_actual_value(format!("(L:{:.2} x W:{:.2} x H:{:.2})", length, width, height))
        .with_expected_range(format!(
            "L {}, W {}, H {}",
            dimensions.length.describe(),
            dimensions.width.describe(),
            dimensions.height.describe()
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AuditSchema;
    use glbaudit_geometry::{IndexRequirements, ModelGeometry, PrimitiveBuffers};
    use pretty_assertions::assert_eq;

    /// A 2 x 1 quad in the XY plane, lifted to z = 3.
    fn panel(name: &str) -> PrimitiveBuffers {
        PrimitiveBuffers {
            name: name.to_string(),
            positions: vec![0.0, 0.0, 3.0, 2.0, 0.0, 3.0, 2.0, 1.0, 3.0, 0.0, 1.0, 3.0],
            uvs: None,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    fn build(buffers: Vec<PrimitiveBuffers>) -> ModelGeometry {
        ModelGeometry::build(&buffers, IndexRequirements::NONE).unwrap()
    }

    #[test]
    fn test_unset_ranges_report_nothing() {
        let model = build(vec![panel("a")]);
        let schema = AuditSchema::default();
        let ctx = AuditContext::new(&schema, &model, &[]);
        for rule in all_rules() {
            assert!(rule.check(&ctx).is_empty(), "{}", rule.id());
        }
    }

    #[test]
    fn test_triangle_count_over_maximum() {
        let model = build(vec![panel("a"), panel("b")]);
        let schema = AuditSchema::from_json(r#"{ "model": { "triangles": { "maximum": 3 } } }"#).unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = TriangleCountRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Triangle count 4 > 3");
        assert_eq!(issues[0].expected_range.as_deref(), Some("<= 3"));
    }

    #[test]
    fn test_primitive_count_under_minimum() {
        let model = build(vec![panel("a")]);
        let schema =
            AuditSchema::from_json(r#"{ "model": { "objectCount": { "primitives": { "minimum": 2, "maximum": 4 } } } }"#)
                .unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = PrimitiveCountRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Primitive count 1 < 2");
        assert_eq!(issues[0].schema_path.as_deref(), Some("model.objectCount.primitives"));
    }

    #[test]
    fn test_dimensions_within_bounds() {
        let model = build(vec![panel("a")]);
        let schema = AuditSchema::from_json(
            r#"{ "product": { "dimensions": { "length": { "minimum": 1.9, "maximum": 2.1 }, "height": { "maximum": 1 } } } }"#,
        )
        .unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        assert!(DimensionsRule.check(&ctx).is_empty());
    }

    #[test]
    fn test_dimensions_out_of_bounds() {
        let model = build(vec![panel("a")]);
        let schema = AuditSchema::from_json(
            r#"{ "product": { "dimensions": { "length": { "maximum": 1.5 }, "width": { "minimum": 0.1 } } } }"#,
        )
        .unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = DimensionsRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Length too big; Width too small");
        assert_eq!(issues[0].actual_value.as_deref(), Some("(L:2.00 x W:0.00 x H:1.00)"));
    }

    #[test]
    fn test_empty_model_has_no_bounds() {
        let model = build(vec![]);
        let schema = AuditSchema::from_json(r#"{ "product": { "dimensions": { "height": { "maximum": 1 } } } }"#).unwrap();
        let ctx = AuditContext::new(&schema, &model, &[]);
        let issues = DimensionsRule.check(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }
}
