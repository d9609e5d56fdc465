//! Audit results: issues raised by rules, grouped by severity.

use serde::{Deserialize, Serialize};

const NOT_COMPUTED: &str = "Not computed: ";

/// How much a raised issue counts against the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Skipped checks and measured values; never fails an audit.
    Info,
    /// Suspicious but within the schema.
    Warning,
    /// A schema requirement failed.
    Error,
}

/// One finding of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    /// Rule that raised the issue, e.g. "geometry/non-manifold".
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,

    /// Mesh name of the primitive at fault. Unset for model-wide findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_location: Option<String>,

    /// Schema key that asked for the check, e.g. "uvs.requireNotOverlapping".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_range: Option<String>,

    /// What to change in the model to clear the issue.
    pub suggestion: String,
}

impl LintIssue {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            asset_location: None,
            schema_path: None,
            actual_value: None,
            expected_range: None,
            suggestion: suggestion.into(),
        }
    }

    /// A check that could not run because `what` was never built.
    pub fn not_computed(rule_id: impl Into<String>, what: &str) -> Self {
        Self::new(
            rule_id,
            Severity::Info,
            format!("{}{}", NOT_COMPUTED, what),
            "Enable the schema option that builds this data",
        )
    }

    /// True for issues made by [`LintIssue::not_computed`].
    pub fn is_skipped(&self) -> bool {
        self.severity == Severity::Info && self.message.starts_with(NOT_COMPUTED)
    }

    pub fn with_asset_location(mut self, location: impl Into<String>) -> Self {
        self.asset_location = Some(location.into());
        self
    }

    pub fn with_schema_path(mut self, path: impl Into<String>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    pub fn with_actual_value(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    pub fn with_expected_range(mut self, range: impl Into<String>) -> Self {
        self.expected_range = Some(range.into());
        self
    }
}

/// Issue counts of an audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// Info issues for checks that could not run.
    pub skipped_count: usize,
}

/// Everything the rules raised for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintReport {
    /// False once any error is added.
    pub passed: bool,
    pub errors: Vec<LintIssue>,
    pub warnings: Vec<LintIssue>,
    pub info: Vec<LintIssue>,
    pub summary: LintSummary,
}

impl LintReport {
    pub fn new() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            summary: LintSummary::default(),
        }
    }

    /// Files `issue` under its severity.
    pub fn add_issue(&mut self, issue: LintIssue) {
        match issue.severity {
            Severity::Info => {
                self.summary.info_count += 1;
                if issue.is_skipped() {
                    self.summary.skipped_count += 1;
                }
                self.info.push(issue);
            }
            Severity::Warning => {
                self.summary.warning_count += 1;
                self.warnings.push(issue);
            }
            Severity::Error => {
                self.summary.error_count += 1;
                self.passed = false;
                self.errors.push(issue);
            }
        }
    }

    /// Every issue, errors first.
    pub fn issues(&self) -> impl Iterator<Item = &LintIssue> {
        self.errors.iter().chain(&self.warnings).chain(&self.info)
    }

    pub fn find(&self, rule_id: &str) -> Option<&LintIssue> {
        self.issues().find(|i| i.rule_id == rule_id)
    }

    /// Issues located in the primitive named `mesh`.
    pub fn issues_for<'a>(&'a self, mesh: &'a str) -> impl Iterator<Item = &'a LintIssue> + 'a {
        self.issues().filter(move |i| i.asset_location.as_deref() == Some(mesh))
    }

    /// Ids of the rules with at least one error, in report order, without repeats.
    pub fn failed_rules(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for issue in &self.errors {
            if !ids.contains(&issue.rule_id.as_str()) {
                ids.push(&issue.rule_id);
            }
        }
        ids
    }

    pub fn has_errors(&self) -> bool {
        !self.passed
    }

    pub fn total_issues(&self) -> usize {
        self.summary.error_count + self.summary.warning_count + self.summary.info_count
    }
}

impl Default for LintReport {
    fn default() -> Self {
        Self::new()
    }
}
