// src/scheduler/state_manager.rs

//! State transitions over the run-state overlay.

use tracing::{debug, warn};

use crate::engine::TaskName;
use crate::logging::{emit, SharedLogger};
use crate::scheduler::task_info::{TaskInfo, TaskState};

/// Applies transitions to a slice of [`TaskInfo`] indexed by asset position.
pub struct StateManager<'a> {
    tasks: &'a mut [TaskInfo],
    logger: &'a SharedLogger,
}

impl<'a> StateManager<'a> {
    pub fn new(tasks: &'a mut [TaskInfo], logger: &'a SharedLogger) -> Self {
        Self { tasks, logger }
    }

    /// Whether every upstream of `idx` succeeded or was excluded.
    pub fn deps_satisfied(&self, idx: usize) -> bool {
        ReadOnlyStateManager::new(self.tasks).deps_satisfied(idx)
    }

    /// Move `idx` from `Pending` to `Excluded`.
    ///
    /// Returns `false` (and changes nothing) for any other starting state.
    pub fn exclude(&mut self, idx: usize) -> bool {
        let Some(info) = self.tasks.get_mut(idx) else {
            return false;
        };
        if info.state != TaskState::Pending {
            debug!(asset = %info.name, state = %info.state, "not pending; leaving as is");
            return false;
        }
        info.state = TaskState::Excluded;
        debug!(asset = %info.name, "excluded from this run");
        true
    }

    /// Pick the first pending asset whose upstreams are satisfied and mark it
    /// `Running`.
    pub fn start_next_ready(&mut self) -> Option<usize> {
        let idx = (0..self.tasks.len()).find(|&i| {
            self.tasks[i].state == TaskState::Pending && self.deps_satisfied(i)
        })?;

        let info = &mut self.tasks[idx];
        info.state = TaskState::Running;
        debug!(asset = %info.name, "dependencies satisfied; marking Running");
        emit(self.logger, &format!("Running:  {}", info.name));
        Some(idx)
    }

    /// Record the result of a running asset.
    pub fn finish(&mut self, idx: usize, succeeded: bool) -> bool {
        let Some(info) = self.tasks.get_mut(idx) else {
            return false;
        };
        if info.state != TaskState::Running {
            warn!(
                asset = %info.name,
                state = %info.state,
                "completion for an asset that is not running; ignoring"
            );
            return false;
        }

        if succeeded {
            info.state = TaskState::Succeeded;
            emit(self.logger, &format!("Finished: {}", info.name));
        } else {
            info.state = TaskState::Failed;
            emit(self.logger, &format!("Failed:   {}", info.name));
        }
        true
    }

    /// Mark every pending asset downstream of `failed` as `Skipped`,
    /// transitively.
    ///
    /// Returns the names of the newly skipped assets.
    pub fn mark_dependents_skipped(&mut self, failed: usize) -> Vec<TaskName> {
        let mut stack: Vec<usize> = self
            .tasks
            .get(failed)
            .map(|info| info.downstreams.clone())
            .unwrap_or_default();

        let mut skipped = Vec::new();

        while let Some(idx) = stack.pop() {
            let info = &mut self.tasks[idx];
            if info.state != TaskState::Pending {
                continue;
            }
            info.state = TaskState::Skipped;
            debug!(asset = %info.name, "upstream failed; marking Skipped");
            emit(self.logger, &format!("Skipped:  {} (upstream failed)", info.name));
            skipped.push(info.name.clone());
            stack.extend(info.downstreams.iter().copied());
        }

        skipped
    }
}

/// A read-only view used where only shared access to the overlay exists.
pub struct ReadOnlyStateManager<'a> {
    tasks: &'a [TaskInfo],
}

impl<'a> ReadOnlyStateManager<'a> {
    pub fn new(tasks: &'a [TaskInfo]) -> Self {
        Self { tasks }
    }

    pub fn deps_satisfied(&self, idx: usize) -> bool {
        let Some(info) = self.tasks.get(idx) else {
            return false;
        };
        info.upstreams
            .iter()
            .all(|&u| self.tasks[u].state.satisfies_downstream())
    }
}
