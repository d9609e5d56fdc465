//! End-to-end audit: container bytes in, lint report out.

use std::path::Path;

use glbaudit_geometry::{GeometrySummary, ModelGeometry};
use glbaudit_glb::load_model;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::registry::RuleRegistry;
use crate::report::LintReport;
use crate::rules::{AuditContext, LintError, TextureSize};
use crate::schema::AuditSchema;

/// Result of auditing one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub summary: GeometrySummary,
    pub report: LintReport,
}

impl AuditOutcome {
    pub fn passed(&self) -> bool {
        self.report.passed
    }
}

/// Runs `registry` over an already built model.
pub fn audit_model(
    registry: &RuleRegistry,
    geometry: &ModelGeometry,
    schema: &AuditSchema,
    textures: &[TextureSize],
) -> AuditOutcome {
    let ctx = AuditContext::new(schema, geometry, textures);
    let report = registry.run(&ctx);
    info!(
        errors = report.summary.error_count,
        warnings = report.summary.warning_count,
        info = report.summary.info_count,
        skipped = report.summary.skipped_count,
        "audit finished"
    );
    AuditOutcome {
        summary: ctx.summary,
        report,
    }
}

/// Loads a GLB, builds exactly the topology `schema` needs, and runs every
/// built-in rule.
pub fn audit_glb(glb: &[u8], schema: &AuditSchema, textures: &[TextureSize]) -> Result<AuditOutcome, LintError> {
    let _span = info_span!("audit_glb", bytes = glb.len()).entered();
    let geometry = load_model(glb, schema.index_requirements())?;
    Ok(audit_model(&RuleRegistry::default_rules(), &geometry, schema, textures))
}

/// [`audit_glb`] on a file read from disk.
pub fn audit_glb_file(
    path: impl AsRef<Path>,
    schema: &AuditSchema,
    textures: &[TextureSize],
) -> Result<AuditOutcome, LintError> {
    let bytes = std::fs::read(path)?;
    audit_glb(&bytes, schema, textures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbaudit_geometry::{IndexRequirements, PrimitiveBuffers};

    #[test]
    fn test_audit_model_summary() {
        let buffers = PrimitiveBuffers {
            name: "tri".to_string(),
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            uvs: Some(vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0]),
            indices: vec![0, 1, 2],
        };
        let geometry = ModelGeometry::build(&[buffers], IndexRequirements::ALL).unwrap();
        let outcome = audit_model(&RuleRegistry::default_rules(), &geometry, &AuditSchema::default(), &[]);
        assert!(outcome.passed());
        assert_eq!(outcome.summary.triangle_count, 1);
        assert_eq!(outcome.report.total_issues(), 0);
    }

    #[test]
    fn test_audit_rejects_garbage() {
        let err = audit_glb(b"not a glb file", &AuditSchema::default(), &[]).unwrap_err();
        assert_eq!(err.code(), "LINT_001");
    }

    #[test]
    fn test_audit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = audit_glb_file(dir.path().join("missing.glb"), &AuditSchema::default(), &[]).unwrap_err();
        assert!(matches!(err, LintError::Io(_)));
    }
}
