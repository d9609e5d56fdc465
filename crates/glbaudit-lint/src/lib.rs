//! Geometry audit rules for glbaudit.
//!
//! Checks a model against the geometry requirements of an asset schema
//! (manifold edges, beveled edges, UV inversion, overlap, range, gutter
//! width, texel density, triangle and primitive budgets, dimensions) and
//! reports failures as structured issues.
//!
//! # Example
//!
//! ```no_run
//! use glbaudit_lint::{audit_glb, AuditSchema, TextureSize};
//!
//! let schema = AuditSchema::from_path("schema.json").unwrap();
//! let glb = std::fs::read("model.glb").unwrap();
//! let outcome = audit_glb(&glb, &schema, &[TextureSize::new(2048, 2048)]).unwrap();
//!
//! if !outcome.passed() {
//!     for issue in &outcome.report.errors {
//!         eprintln!("ERROR: {} - {}", issue.rule_id, issue.message);
//!     }
//! }
//! ```

pub mod audit;
pub mod registry;
pub mod report;
pub mod rules;
pub mod schema;

pub use audit::{audit_glb, audit_glb_file, audit_model, AuditOutcome};
pub use registry::{RuleMetadata, RuleRegistry};
pub use report::{LintIssue, LintReport, LintSummary, Severity};
pub use rules::{AuditContext, GeometryRule, LintError, TextureSize};
pub use schema::{
    AuditSchema, Dimensions, ModelRequirements, ObjectCount, ProductRequirements, UvRequirements, ValueRange,
};
