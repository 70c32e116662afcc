// src/lint/rule.rs

use std::fmt;

use anyhow::Result;

use crate::pipeline::{Asset, Pipeline};

/// A single defect found in a pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Identifier of the rule that reported it, e.g. `acyclic-pipeline`.
    pub rule: String,
    /// Offending asset, if the issue is about one.
    pub asset: Option<String>,
    pub description: String,
}

impl Issue {
    /// Issue about the pipeline itself rather than one asset.
    pub fn for_pipeline(description: impl Into<String>) -> Self {
        Self {
            rule: String::new(),
            asset: None,
            description: description.into(),
        }
    }

    pub fn for_asset(asset: &Asset, description: impl Into<String>) -> Self {
        Self {
            rule: String::new(),
            asset: (!asset.name.is_empty()).then(|| asset.name.clone()),
            description: description.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.asset {
            Some(asset) => write!(f, "[{}] {}: {}", self.rule, asset, self.description),
            None => write!(f, "[{}] {}", self.rule, self.description),
        }
    }
}

/// A named check over a pipeline.
///
/// Rules are stateless and independent: each one inspects the pipeline and
/// returns every issue it finds. `Err` is reserved for failures of the check
/// itself (e.g. an unexpected IO error), never for pipeline defects.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;
    fn validate(&self, pipeline: &Pipeline) -> Result<Vec<Issue>>;
}

pub type Validator = Box<dyn Fn(&Pipeline) -> Result<Vec<Issue>> + Send + Sync>;

/// A rule backed by a plain validator function.
pub struct SimpleRule {
    pub identifier: &'static str,
    pub validator: Validator,
}

impl SimpleRule {
    pub fn new<F>(identifier: &'static str, validator: F) -> Self
    where
        F: Fn(&Pipeline) -> Result<Vec<Issue>> + Send + Sync + 'static,
    {
        Self {
            identifier,
            validator: Box::new(validator),
        }
    }
}

impl fmt::Debug for SimpleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleRule")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl Rule for SimpleRule {
    fn name(&self) -> &str {
        self.identifier
    }

    fn validate(&self, pipeline: &Pipeline) -> Result<Vec<Issue>> {
        let mut issues = (self.validator)(pipeline)?;
        for issue in issues.iter_mut() {
            issue.rule = self.identifier.to_string();
        }
        Ok(issues)
    }
}
