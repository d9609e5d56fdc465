//! XYZ topology rules: manifold edges and beveled edges.

use glbaudit_geometry::XyzTopology;

use crate::report::{LintIssue, Severity};
use crate::rules::{AuditContext, GeometryRule};

pub fn all_rules() -> Vec<Box<dyn GeometryRule>> {
    vec![Box::new(NonManifoldRule), Box::new(HardEdgesRule)]
}

/// Runs `count` over every primitive's XYZ topology.
///
/// One issue per primitive with a non-zero count, or a single info issue
/// when the topology was never built.
fn per_primitive(
    ctx: &AuditContext,
    rule_id: &'static str,
    count: fn(&XyzTopology) -> usize,
    issue: impl Fn(usize) -> LintIssue,
) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    for prim in &ctx.geometry.primitives {
        let Some(xyz) = &prim.xyz else {
            return vec![LintIssue::not_computed(rule_id, "XYZ edge topology")];
        };
        let n = count(xyz);
        if n > 0 {
            issues.push(issue(n).with_asset_location(prim.name.clone()));
        }
    }
    issues
}

/// Rule 1: Non-manifold edges
///
/// Detection: edge shared by more than 2 triangles after vertex dedup
pub struct NonManifoldRule;

impl GeometryRule for NonManifoldRule {
    fn id(&self) -> &'static str {
        "geometry/non-manifold"
    }

    fn description(&self) -> &'static str {
        "Detects non-manifold edges (edges shared by more than 2 triangles)"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        if !ctx.schema.model.require_manifold_edges {
            return vec![];
        }
        per_primitive(ctx, self.id(), XyzTopology::non_manifold_edge_count, |n| {
            LintIssue::new(
                self.id(),
                self.default_severity(),
                format!("{} non-manifold edges", n),
                "Merge or remove faces so each edge joins at most two triangles",
            )
            .with_schema_path("model.requireManifoldEdges")
            .with_actual_value(n.to_string())
            .with_expected_range("0")
        })
    }
}

/// Rule 2: Hard edges
///
/// Detection: interior edge whose adjacent face normals differ by 90 degrees or more
pub struct HardEdgesRule;

impl GeometryRule for HardEdgesRule {
    fn id(&self) -> &'static str {
        "geometry/hard-edges"
    }

    fn description(&self) -> &'static str {
        "Detects unbeveled edges (face angle of 90 degrees or more)"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue> {
        if !ctx.schema.model.require_beveled_edges {
            return vec![];
        }
        per_primitive(ctx, self.id(), XyzTopology::hard_edge_count, |n| {
            LintIssue::new(
                self.id(),
                self.default_severity(),
                format!("{} hard edges (>= 90 degrees)", n),
                "Bevel sharp edges so no two adjacent faces meet at 90 degrees or more",
            )
            .with_schema_path("model.requireBeveledEdges")
            .with_actual_value(n.to_string())
            .with_expected_range("0")
        })
    }
}
