//! The set of rules an audit runs, each switchable by id.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::report::{LintReport, Severity};
use crate::rules::{self, AuditContext, GeometryRule};

struct Entry {
    rule: Box<dyn GeometryRule>,
    enabled: bool,
}

/// Ordered rules with an on/off switch each. Rules run in registration order.
pub struct RuleRegistry {
    entries: Vec<Entry>,
}

impl RuleRegistry {
    /// A registry with no rules.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Every built-in rule, all enabled.
    pub fn default_rules() -> Self {
        let mut registry = Self::new();
        for rule in rules::all_rules() {
            registry.register(rule);
        }
        registry
    }

    /// Appends `rule`, enabled.
    pub fn register(&mut self, rule: Box<dyn GeometryRule>) {
        self.entries.push(Entry { rule, enabled: true });
    }

    /// Switches off the rule with `rule_id`. Unknown ids are ignored.
    pub fn disable_rule(&mut self, rule_id: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.rule.id() == rule_id) {
            entry.enabled = false;
        }
    }

    /// Switches on exactly the rules in `rule_ids` and off every other one.
    pub fn enable_only(&mut self, rule_ids: &[&str]) {
        for entry in &mut self.entries {
            entry.enabled = rule_ids.contains(&entry.rule.id());
        }
    }

    /// Registered rules that will run.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &dyn GeometryRule> {
        self.entries.iter().filter(|e| e.enabled).map(|e| e.rule.as_ref())
    }

    /// Id, description, severity and switch state of every registered rule.
    pub fn rule_metadata(&self) -> Vec<RuleMetadata> {
        self.entries
            .iter()
            .map(|e| RuleMetadata {
                id: e.rule.id().to_string(),
                description: e.rule.description().to_string(),
                severity: e.rule.default_severity(),
                enabled: e.enabled,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every enabled rule against `ctx` and collects their issues.
    pub fn run(&self, ctx: &AuditContext) -> LintReport {
        let mut report = LintReport::new();
        for entry in &self.entries {
            let id = entry.rule.id();
            if !entry.enabled {
                trace!(rule = id, "rule disabled");
                continue;
            }

            let issues = entry.rule.check(ctx);
            let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
            if errors > 0 {
                debug!(rule = id, errors, "requirement failed");
            }
            for issue in issues {
                report.add_issue(issue);
            }
        }
        report
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Listing entry for one registered rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub id: String,
    pub description: String,
    /// Severity of a failed requirement.
    pub severity: Severity,
    pub enabled: bool,
}
