// src/lint/mod.rs

//! Static validation of pipeline definitions.
//!
//! - [`rule`] defines [`Rule`], [`SimpleRule`] and [`Issue`].
//! - [`rules`] holds the validator functions.
//! - [`list`] builds the ordered rule registry.
//! - [`linter`] runs a registry over a pipeline.
//! - [`cron`] checks schedule expressions.

pub mod cron;
pub mod linter;
pub mod list;
pub mod rule;
pub mod rules;

pub use linter::Linter;
pub use list::get_rules;
pub use rule::{Issue, Rule, SimpleRule};
