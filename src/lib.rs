// src/lib.rs

pub mod cli;
pub mod connectors;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod lint;
pub mod logging;
pub mod pipeline;
pub mod scheduler;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command, RunArgs};
use crate::engine::{RunResult, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::{AssetdagError, Result};
use crate::exec::{CommandRunner, TaskRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::lint::{get_rules, Issue, Linter};
use crate::logging::{RunLogger, SharedLogger, TracingLogger};
use crate::pipeline::{load_pipeline, Pipeline};
use crate::scheduler::{
    assets_with_any_tag, exclude_assets_by_tag, include_assets_by_tags, Scheduler,
};

/// Knobs for a pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of assets running at the same time.
    pub workers: usize,
    /// When non-empty, only assets carrying one of these tags run.
    pub include_tags: Vec<String>,
    /// Assets carrying any of these tags are excluded.
    pub exclude_tags: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: engine::default_workers(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
        }
    }
}

/// Validation entry point: run every lint rule over `pipeline`.
///
/// A non-empty result means the pipeline failed validation. `Err` is only
/// returned when a rule could not run at all.
pub fn validate_pipeline(pipeline: &Pipeline, fs: Arc<dyn FileSystem>) -> Result<Vec<Issue>> {
    let linter = Linter::new(get_rules(fs));
    Ok(linter.lint(pipeline)?)
}

/// Build a scheduler for `pipeline` with the tag filters from `options`
/// applied.
///
/// Include tags are applied first; exclude tags then apply to the included
/// assets, or to the whole pipeline when no include tag was given.
pub fn prepare_scheduler(
    pipeline: &Pipeline,
    options: &RunOptions,
    logger: SharedLogger,
) -> Scheduler {
    let mut scheduler = Scheduler::new(logger, pipeline);

    let subset = if options.include_tags.is_empty() {
        Vec::new()
    } else {
        let kept = include_assets_by_tags(&options.include_tags, pipeline, &mut scheduler);
        info!(tags = ?options.include_tags, kept, "filtered assets by include tags");
        assets_with_any_tag(&options.include_tags, pipeline)
    };

    for tag in &options.exclude_tags {
        let excluded = exclude_assets_by_tag(tag, pipeline, &mut scheduler, &subset);
        debug!(tag = %tag, excluded, "applied exclude tag");
    }

    scheduler
}

/// Run entry point: execute `pipeline` with `runner`.
pub async fn run_pipeline(
    pipeline: &Pipeline,
    runner: Arc<dyn TaskRunner>,
    options: RunOptions,
    logger: SharedLogger,
) -> Result<RunResult> {
    let scheduler = prepare_scheduler(pipeline, &options, logger);
    let runtime = Runtime::new(
        scheduler,
        runner,
        RuntimeOptions {
            workers: options.workers,
        },
    );
    runtime.run().await
}

/// High-level entry point used by `main.rs`.
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Validate { path } => {
            let pipeline = load_pipeline(fs.as_ref(), &path)?;
            let issues = validate_pipeline(&pipeline, fs)?;
            print_issues(&pipeline, &issues);
            Ok(if issues.is_empty() { 0 } else { 1 })
        }
        Command::Run(run_args) => run_command(run_args, fs).await,
    }
}

async fn run_command(args: RunArgs, fs: Arc<dyn FileSystem>) -> Result<i32> {
    if args.workers == Some(0) {
        return Err(AssetdagError::ConfigError(
            "--workers must be at least 1".to_string(),
        ));
    }

    let pipeline = load_pipeline(fs.as_ref(), &args.path)?;

    let issues = validate_pipeline(&pipeline, fs)?;
    if !issues.is_empty() {
        print_issues(&pipeline, &issues);
        if !args.skip_validation {
            return Ok(1);
        }
        warn!(issues = issues.len(), "running despite validation issues");
    }

    let logger: Arc<dyn RunLogger> = Arc::new(TracingLogger);
    let options = RunOptions {
        workers: args.workers.unwrap_or_else(engine::default_workers),
        include_tags: args.include_tags,
        exclude_tags: args.exclude_tags,
    };

    let scheduler = prepare_scheduler(&pipeline, &options, Some(Arc::clone(&logger)));
    let runner = Arc::new(CommandRunner::new(Some(logger)));
    let runtime = Runtime::new(
        scheduler,
        runner,
        RuntimeOptions {
            workers: options.workers,
        },
    );

    // Ctrl-C -> stop dispatching, let running assets finish.
    {
        let tx = runtime.event_sender();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::CancelRequested).await;
        });
    }

    let result = runtime.run().await?;
    print_run_result(&result);

    Ok(if result.is_success() { 0 } else { 1 })
}

fn print_issues(pipeline: &Pipeline, issues: &[Issue]) {
    if issues.is_empty() {
        println!(
            "Pipeline '{}' is valid ({} assets).",
            pipeline.name,
            pipeline.assets().len()
        );
        return;
    }

    println!(
        "Pipeline '{}' has {} issue(s):",
        pipeline.name,
        issues.len()
    );
    for issue in issues {
        println!("  {issue}");
    }
}

fn print_run_result(result: &RunResult) {
    for state in &result.states {
        println!("  {:<10} {}", state.state.as_str(), state.name);
    }
    if result.cancelled {
        println!("Run cancelled.");
    } else if result.is_success() {
        println!("Run succeeded.");
    } else {
        println!("Run failed: {}", result.failed_assets().join(", "));
    }
}
