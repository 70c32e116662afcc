// src/lint/list.rs

use std::sync::Arc;

use crate::fs::FileSystem;
use crate::lint::rule::{Rule, SimpleRule};
use crate::lint::rules::*;

/// Build the rule registry.
///
/// The order is fixed and only determines the order issues are reported in.
/// Capabilities the rules need are passed in explicitly.
pub fn get_rules(fs: Arc<dyn FileSystem>) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SimpleRule::new("task-name-valid", ensure_task_name_is_valid)),
        Box::new(SimpleRule::new("task-name-unique", ensure_task_name_is_unique)),
        Box::new(SimpleRule::new("dependency-exists", ensure_dependency_exists)),
        Box::new(SimpleRule::new(
            "valid-executable-file",
            ensure_executable_file_is_valid(fs),
        )),
        Box::new(SimpleRule::new(
            "valid-pipeline-schedule",
            ensure_pipeline_schedule_is_valid_cron,
        )),
        Box::new(SimpleRule::new(
            "valid-pipeline-name",
            ensure_pipeline_name_is_valid,
        )),
        Box::new(SimpleRule::new(
            "valid-task-type",
            ensure_only_accepted_task_types_are_there,
        )),
        Box::new(SimpleRule::new("acyclic-pipeline", ensure_pipeline_has_no_cycles)),
        Box::new(SimpleRule::new(
            "valid-athena-sql-task",
            ensure_athena_sql_task_has_database_and_s3_path,
        )),
        Box::new(SimpleRule::new(
            "valid-slack-notification",
            ensure_slack_field_is_valid,
        )),
        Box::new(SimpleRule::new("valid-start-date", ensure_start_date_is_valid)),
    ]
}
