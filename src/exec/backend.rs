// src/exec/backend.rs

//! Pluggable task runner abstraction.
//!
//! The runtime talks to a `TaskRunner` instead of spawning processes itself.
//! Production uses [`CommandRunner`](super::task_runner::CommandRunner); tests
//! provide fakes that record calls and return scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

use crate::engine::TaskOutcome;
use crate::scheduler::ScheduledAsset;

/// Executes a single asset.
///
/// `Ok(TaskOutcome::Failed(_))` is an ordinary asset failure; `Err` means the
/// runner itself could not do its job. The runtime records both as a failed
/// asset.
pub trait TaskRunner: Send + Sync {
    fn run_asset(
        &self,
        task: ScheduledAsset,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>>;
}
