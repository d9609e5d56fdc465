//! Geometry rule trait and the rule modules.

use glbaudit_geometry::{GeometrySummary, ModelGeometry};
use glbaudit_glb::GlbError;
use serde::{Deserialize, Serialize};

use crate::report::{LintIssue, Severity};
use crate::schema::AuditSchema;

pub mod model;
pub mod topology;
pub mod uv;

/// Pixel size of one texture bound to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Everything a rule can look at.
pub struct AuditContext<'a> {
    pub schema: &'a AuditSchema,
    pub geometry: &'a ModelGeometry,
    pub summary: GeometrySummary,
    pub textures: &'a [TextureSize],
}

impl<'a> AuditContext<'a> {
    pub fn new(schema: &'a AuditSchema, geometry: &'a ModelGeometry, textures: &'a [TextureSize]) -> Self {
        Self {
            schema,
            geometry,
            summary: geometry.summary(),
            textures,
        }
    }
}

/// A requirement check over a built model.
pub trait GeometryRule: Send + Sync {
    /// Unique identifier (e.g., "geometry/non-manifold", "uv/gutter").
    fn id(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Severity of a failed requirement.
    fn default_severity(&self) -> Severity;

    /// Run the check, return issues found.
    ///
    /// Rules whose schema requirement is off return nothing.
    fn check(&self, ctx: &AuditContext) -> Vec<LintIssue>;
}

/// Every built-in rule, in report order.
pub fn all_rules() -> Vec<Box<dyn GeometryRule>> {
    let mut rules = topology::all_rules();
    rules.extend(uv::all_rules());
    rules.extend(model::all_rules());
    rules
}

/// Errors that can occur while auditing.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// The container could not be read or its geometry could not be built.
    #[error(transparent)]
    Glb(#[from] GlbError),

    /// The schema is not valid JSON for [`AuditSchema`].
    #[error("invalid audit schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// Failed to read a schema or model file.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    pub fn code(&self) -> &'static str {
        match self {
            LintError::Glb(_) => "LINT_001",
            LintError::Schema(_) => "LINT_002",
            LintError::Io(_) => "LINT_003",
        }
    }
}
