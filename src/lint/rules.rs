// src/lint/rules.rs

//! Validator functions behind the registered lint rules.
//!
//! Every validator reports issues in asset definition order and never stops at
//! the first problem.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;

use crate::fs::FileSystem;
use crate::lint::cron::parse_schedule;
use crate::lint::rule::Issue;
use crate::pipeline::{Asset, AssetType, Pipeline, SlackNotification};

static VALID_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("name pattern is a valid regex")
});

const START_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn ensure_task_name_is_valid(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for asset in pipeline.assets() {
        if asset.name.trim().is_empty() {
            issues.push(Issue::for_asset(asset, "A task must have a name"));
        } else if !VALID_NAME.is_match(&asset.name) {
            issues.push(Issue::for_asset(
                asset,
                "A task name must be made of alphanumeric characters, dashes, dots and underscores",
            ));
        }
    }
    Ok(issues)
}

pub fn ensure_task_name_is_unique(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for asset in pipeline.assets() {
        *counts.entry(asset.name.as_str()).or_default() += 1;
    }

    let mut reported: HashSet<&str> = HashSet::new();
    let mut issues = Vec::new();
    for asset in pipeline.assets() {
        let name = asset.name.as_str();
        if name.is_empty() || counts[name] < 2 || !reported.insert(name) {
            continue;
        }
        issues.push(Issue::for_asset(
            asset,
            format!(
                "Asset name '{name}' is not unique, please make sure all the asset names are unique"
            ),
        ));
    }
    Ok(issues)
}

pub fn ensure_dependency_exists(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for asset in pipeline.assets() {
        for upstream in &asset.upstreams {
            if !pipeline.contains(upstream) {
                issues.push(Issue::for_asset(
                    asset,
                    format!("Dependency '{upstream}' does not exist"),
                ));
            }
        }
    }
    Ok(issues)
}

/// Build the executable-file validator around the given filesystem.
pub fn ensure_executable_file_is_valid(
    fs: Arc<dyn FileSystem>,
) -> impl Fn(&Pipeline) -> Result<Vec<Issue>> + Send + Sync + 'static {
    move |pipeline: &Pipeline| {
        let mut issues = Vec::new();
        for asset in pipeline.assets() {
            if let Some(issue) = check_executable_file(fs.as_ref(), asset) {
                issues.push(issue);
            }
        }
        Ok(issues)
    }
}

fn check_executable_file(fs: &dyn FileSystem, asset: &Asset) -> Option<Issue> {
    // Unknown types are reported by `valid-task-type`.
    let kind = asset.kind()?;
    if !kind.requires_executable() {
        return None;
    }

    let Some(path) = asset.executable_file.as_deref() else {
        return Some(Issue::for_asset(
            asset,
            format!("Assets of type '{kind}' must have an executable file"),
        ));
    };

    if !fs.exists(path) {
        return Some(Issue::for_asset(
            asset,
            format!("The executable file does not exist: {}", path.display()),
        ));
    }

    if fs.is_dir(path) {
        return Some(Issue::for_asset(
            asset,
            format!(
                "The executable file is a directory, must be a file: {}",
                path.display()
            ),
        ));
    }

    let mut reader = match fs.open_read(path) {
        Ok(reader) => reader,
        Err(err) => {
            return Some(Issue::for_asset(
                asset,
                format!("The executable file is not readable: {err}"),
            ));
        }
    };

    let mut first = [0u8; 1];
    match reader.read(&mut first) {
        Ok(0) => Some(Issue::for_asset(
            asset,
            format!("The executable file is empty: {}", path.display()),
        )),
        Ok(_) => None,
        Err(err) => Some(Issue::for_asset(
            asset,
            format!("The executable file is not readable: {err}"),
        )),
    }
}

pub fn ensure_pipeline_schedule_is_valid_cron(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    if let Some(schedule) = non_empty(&pipeline.schedule) {
        if let Err(err) = parse_schedule(schedule) {
            issues.push(Issue::for_pipeline(format!(
                "Invalid cron schedule '{schedule}': {err}"
            )));
        }
    }

    for asset in pipeline.assets() {
        if let Some(schedule) = non_empty(&asset.schedule) {
            if let Err(err) = parse_schedule(schedule) {
                issues.push(Issue::for_asset(
                    asset,
                    format!("Invalid cron schedule '{schedule}': {err}"),
                ));
            }
        }
    }

    Ok(issues)
}

pub fn ensure_pipeline_name_is_valid(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let name = pipeline.name.trim();
    if name.is_empty() {
        return Ok(vec![Issue::for_pipeline("A pipeline must have a name")]);
    }
    if !VALID_NAME.is_match(&pipeline.name) {
        return Ok(vec![Issue::for_pipeline(
            "A pipeline name must be made of alphanumeric characters, dashes, dots and underscores",
        )]);
    }
    Ok(Vec::new())
}

pub fn ensure_only_accepted_task_types_are_there(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for asset in pipeline.assets() {
        if asset.asset_type.trim().is_empty() {
            issues.push(Issue::for_asset(asset, "An asset must have a type"));
            continue;
        }
        if asset.kind().is_none() {
            let accepted: Vec<&str> = AssetType::ALL.iter().map(AssetType::as_str).collect();
            issues.push(Issue::for_asset(
                asset,
                format!(
                    "Invalid asset type '{}', expected one of: {}",
                    asset.asset_type,
                    accepted.join(", ")
                ),
            ));
        }
    }
    Ok(issues)
}

pub fn ensure_pipeline_has_no_cycles(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let graph = pipeline.name_graph();
    let names = graph.names();
    let mut cycles = graph.find_cycles();
    cycles.sort_by_key(|cycle| cycle.iter().copied().min());

    let issues = cycles
        .into_iter()
        .filter_map(|cycle| {
            let first = *cycle.first()?;
            let path: Vec<&str> = cycle
                .iter()
                .chain(std::iter::once(&first))
                .map(|&i| names[i].as_str())
                .collect();
            Some(Issue::for_asset(
                pipeline.asset(&names[first])?,
                format!("Pipeline has a cycle with dependencies: {}", path.join(" -> ")),
            ))
        })
        .collect();

    Ok(issues)
}

pub fn ensure_athena_sql_task_has_database_and_s3_path(
    pipeline: &Pipeline,
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for asset in pipeline.assets() {
        if asset.kind() != Some(AssetType::AthenaSql) {
            continue;
        }

        if asset.parameter("database").is_none_or(|db| db.trim().is_empty()) {
            issues.push(Issue::for_asset(
                asset,
                "Athena SQL assets must have a non-empty `database` parameter",
            ));
        }

        match asset.parameter("s3_file_path").map(str::trim) {
            None | Some("") => issues.push(Issue::for_asset(
                asset,
                "Athena SQL assets must have a non-empty `s3_file_path` parameter",
            )),
            Some(path) if !path.starts_with("s3://") => issues.push(Issue::for_asset(
                asset,
                format!("The `s3_file_path` parameter must start with s3://, got '{path}'"),
            )),
            Some(_) => {}
        }
    }
    Ok(issues)
}

pub fn ensure_slack_field_is_valid(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    let mut channels: HashSet<&str> = HashSet::new();
    for slack in &pipeline.notifications.slack {
        if let Some(problem) = slack_problem(slack) {
            issues.push(Issue::for_pipeline(problem));
            continue;
        }
        if !channels.insert(slack.channel.as_str()) {
            issues.push(Issue::for_pipeline(format!(
                "The Slack channel '{}' is defined multiple times",
                slack.channel
            )));
        }
    }

    for asset in pipeline.assets() {
        if let Some(problem) = asset.slack.as_ref().and_then(slack_problem) {
            issues.push(Issue::for_asset(asset, problem));
        }
    }

    Ok(issues)
}

fn slack_problem(slack: &SlackNotification) -> Option<String> {
    if slack.channel.trim().is_empty() {
        return Some("Slack notifications must have a non-empty `channel`".to_string());
    }
    if slack.webhook.as_deref().is_some_and(|w| w.trim().is_empty()) {
        return Some(format!(
            "The Slack notification for channel '{}' has an empty `webhook`",
            slack.channel
        ));
    }
    None
}

pub fn ensure_start_date_is_valid(pipeline: &Pipeline) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    if let Some(date) = non_empty(&pipeline.start_date) {
        if NaiveDate::parse_from_str(date, START_DATE_FORMAT).is_err() {
            issues.push(Issue::for_pipeline(format!(
                "start_date must be a valid date in the format of YYYY-MM-DD, '{date}' given"
            )));
        }
    }

    for asset in pipeline.assets() {
        if let Some(date) = non_empty(&asset.start_date) {
            if NaiveDate::parse_from_str(date, START_DATE_FORMAT).is_err() {
                issues.push(Issue::for_asset(
                    asset,
                    format!(
                        "start_date must be a valid date in the format of YYYY-MM-DD, '{date}' given"
                    ),
                ));
            }
        }
    }

    Ok(issues)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
