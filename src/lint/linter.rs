// src/lint/linter.rs

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::lint::rule::{Issue, Rule};
use crate::pipeline::Pipeline;

/// Runs a set of rules over a pipeline.
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// Run every rule and concatenate their issues in registration order.
    ///
    /// Issues never stop the run; only a failing rule does.
    pub fn lint(&self, pipeline: &Pipeline) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for rule in &self.rules {
            let mut found = rule
                .validate(pipeline)
                .with_context(|| format!("rule '{}' failed to run", rule.name()))?;
            debug!(rule = rule.name(), issues = found.len(), "rule finished");
            issues.append(&mut found);
        }

        info!(
            pipeline = %pipeline.name,
            rules = self.rules.len(),
            issues = issues.len(),
            "pipeline validated"
        );

        Ok(issues)
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}
