// tests/runtime_fake_runner.rs

mod common;
use crate::common::{chain_with_sibling, init_tracing, AssetBuilder, PipelineBuilder};

use std::error::Error;
use std::sync::Arc;

use tokio::time::{timeout, Duration};

use assetdag::engine::{Runtime, RuntimeEvent, RuntimeOptions};
use assetdag::pipeline::Pipeline;
use assetdag::scheduler::{Scheduler, TaskState};
use assetdag::{run_pipeline, RunOptions};
use assetdag_test_utils::fake_runner::FakeRunner;
use assetdag_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

fn options(workers: usize) -> RunOptions {
    RunOptions {
        workers,
        ..RunOptions::default()
    }
}

fn wide(n: usize) -> Pipeline {
    let mut builder = PipelineBuilder::new("wide");
    for i in 0..n {
        builder = builder.with_asset(AssetBuilder::empty(&format!("leaf_{i}")).build());
    }
    builder.build()
}

#[tokio::test]
async fn runtime_with_fake_runner_runs_simple_chain() -> TestResult {
    init_tracing();

    let p = PipelineBuilder::new("chain")
        .with_asset(AssetBuilder::empty("A").build())
        .with_asset(AssetBuilder::empty("B").depends("A").build())
        .build();
    let runner = Arc::new(FakeRunner::new());

    // Enforce an upper bound on how long this test may run.
    let result = timeout(
        Duration::from_secs(3),
        run_pipeline(&p, runner.clone(), options(4), None),
    )
    .await
    .expect("runtime did not finish within 3 seconds")?;

    assert_eq!(runner.executed(), vec!["A".to_string(), "B".to_string()]);
    assert!(result.is_success());
    assert!(!result.cancelled);
    assert_eq!(result.count(TaskState::Succeeded), 2);
    Ok(())
}

#[tokio::test]
async fn failure_skips_descendants_but_siblings_complete() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new().failing("a"));
    let result = with_timeout(run_pipeline(
        &chain_with_sibling(),
        runner.clone(),
        options(2),
        None,
    ))
    .await?;

    assert_eq!(result.state_of("a"), Some(TaskState::Failed));
    assert_eq!(result.state_of("b"), Some(TaskState::Skipped));
    assert_eq!(result.state_of("c"), Some(TaskState::Skipped));
    assert_eq!(result.state_of("d"), Some(TaskState::Succeeded));
    assert!(!result.is_success());
    assert_eq!(result.failed_assets(), vec!["a"]);

    let mut executed = runner.executed();
    executed.sort();
    assert_eq!(executed, vec!["a".to_string(), "d".to_string()]);
    Ok(())
}

#[tokio::test]
async fn runner_errors_are_recorded_as_failures() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new().erroring("b"));
    let result = with_timeout(run_pipeline(
        &chain_with_sibling(),
        runner.clone(),
        options(1),
        None,
    ))
    .await?;

    assert_eq!(result.state_of("b"), Some(TaskState::Failed));
    assert_eq!(result.state_of("c"), Some(TaskState::Skipped));
    assert_eq!(result.state_of("a"), Some(TaskState::Succeeded));
    assert_eq!(result.state_of("d"), Some(TaskState::Succeeded));
    Ok(())
}

#[tokio::test]
async fn excluded_assets_do_not_run_and_do_not_block() -> TestResult {
    init_tracing();

    let p = PipelineBuilder::new("excluded")
        .with_asset(AssetBuilder::empty("extract").tag("slow").build())
        .with_asset(AssetBuilder::empty("transform").depends("extract").build())
        .build();
    let runner = Arc::new(FakeRunner::new());
    let opts = RunOptions {
        workers: 2,
        include_tags: vec![],
        exclude_tags: vec!["slow".to_string()],
    };

    let result = with_timeout(run_pipeline(&p, runner.clone(), opts, None)).await?;

    assert_eq!(runner.executed(), vec!["transform".to_string()]);
    assert_eq!(result.state_of("extract"), Some(TaskState::Excluded));
    assert_eq!(result.state_of("transform"), Some(TaskState::Succeeded));
    assert!(result.is_success());
    Ok(())
}

#[tokio::test]
async fn worker_count_bounds_concurrency() -> TestResult {
    init_tracing();

    let runner = Arc::new(FakeRunner::new().with_delay(Duration::from_millis(20)));
    let result = with_timeout(run_pipeline(&wide(8), runner.clone(), options(2), None)).await?;

    assert!(result.is_success());
    assert_eq!(runner.executed().len(), 8);
    assert!(runner.peak_concurrency() <= 2);
    assert!(runner.peak_concurrency() >= 1);
    Ok(())
}

#[tokio::test]
async fn zero_workers_still_makes_progress() -> TestResult {
    let runner = Arc::new(FakeRunner::new());
    let result = with_timeout(run_pipeline(&wide(3), runner.clone(), options(0), None)).await?;

    assert!(result.is_success());
    assert_eq!(runner.peak_concurrency(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_pipeline_finishes_immediately() -> TestResult {
    let runner = Arc::new(FakeRunner::new());
    let p = PipelineBuilder::new("empty").build();

    let result = with_timeout(run_pipeline(&p, runner.clone(), options(2), None)).await?;

    assert!(result.states.is_empty());
    assert!(result.is_success());
    Ok(())
}

#[tokio::test]
async fn cancellation_stops_dispatch_and_leaves_pending() -> TestResult {
    init_tracing();

    let p = chain_with_sibling();
    let (runner, mut started) = FakeRunner::new()
        .with_delay_for("a", Duration::from_millis(200))
        .with_delay_for("d", Duration::from_millis(200))
        .with_start_notifier();
    let runner = Arc::new(runner);

    let scheduler = Scheduler::new(None, &p);
    let runtime = Runtime::new(scheduler, runner.clone(), RuntimeOptions { workers: 4 });
    let tx = runtime.event_sender();
    let handle = tokio::spawn(runtime.run());

    // Wait until the first asset is actually running, then cancel.
    let first = with_timeout(started.recv()).await;
    assert!(first.is_some());
    tx.send(RuntimeEvent::CancelRequested).await?;

    let result = with_timeout(handle).await??;

    assert!(result.cancelled);
    assert!(!result.is_success());
    assert_eq!(result.state_of("a"), Some(TaskState::Succeeded));
    assert_eq!(result.state_of("b"), Some(TaskState::Pending));
    assert_eq!(result.state_of("c"), Some(TaskState::Pending));
    assert!(!runner.executed().contains(&"b".to_string()));
    Ok(())
}
