// src/scheduler/task_info.rs

//! Per-asset run state.

use std::fmt;

use crate::engine::TaskName;
use crate::pipeline::Asset;

/// State of one asset within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Not started yet; initial state.
    Pending,
    /// Removed from this run by a tag filter. Counts as satisfied for
    /// downstream assets.
    Excluded,
    /// Handed to the task runner.
    Running,
    Succeeded,
    Failed,
    /// Never attempted because an upstream failed or was skipped.
    Skipped,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Excluded | TaskState::Succeeded | TaskState::Failed | TaskState::Skipped
        )
    }

    /// Whether a downstream asset may start once its upstream is in this state.
    pub fn satisfies_downstream(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Excluded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Excluded => "excluded",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
            TaskState::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static asset information plus its state in the current run.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: TaskName,
    /// Position of the asset in the pipeline.
    pub index: usize,
    /// Indices of direct upstreams that exist in the pipeline.
    pub upstreams: Vec<usize>,
    /// Indices of direct downstreams.
    pub downstreams: Vec<usize>,
    pub state: TaskState,
}

/// An asset the scheduler wants the runner to execute now.
#[derive(Debug, Clone)]
pub struct ScheduledAsset {
    pub name: TaskName,
    pub index: usize,
    pub asset: Asset,
}
