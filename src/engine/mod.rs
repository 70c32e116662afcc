// src/engine/mod.rs

//! Execution engine for assetdag.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) is a pure, synchronous state
//! machine. [`runtime`] is the async shell around it: it dispatches ready
//! assets to a bounded pool of workers, feeds their outcomes back into the
//! scheduler, and reacts to cancellation.

use crate::scheduler::TaskState;

/// Canonical asset name type used throughout the engine.
pub type TaskName = String;

/// Outcome of running one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// Failed with the given exit code (`-1` when there was none).
    Failed(i32),
}

/// Runtime options.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Maximum number of assets running at the same time.
    pub workers: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Available parallelism of the machine, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Events flowing into the runtime from outside the worker pool.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Stop dispatching new assets; running ones are awaited.
    CancelRequested,
}

/// Final state of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRunState {
    pub name: TaskName,
    pub state: TaskState,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Per-asset states in pipeline order.
    pub states: Vec<AssetRunState>,
    pub cancelled: bool,
}

impl RunResult {
    /// All assets terminal and none failed.
    pub fn is_success(&self) -> bool {
        self.states
            .iter()
            .all(|s| s.state.is_terminal() && s.state != TaskState::Failed)
    }

    pub fn state_of(&self, name: &str) -> Option<TaskState> {
        self.states
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.state)
    }

    pub fn count(&self, state: TaskState) -> usize {
        self.states.iter().filter(|s| s.state == state).count()
    }

    pub fn failed_assets(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|s| s.state == TaskState::Failed)
            .map(|s| s.name.as_str())
            .collect()
    }
}

pub mod runtime;

pub use runtime::Runtime;
