// src/scheduler/core.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::engine::{TaskName, TaskOutcome};
use crate::logging::SharedLogger;
use crate::pipeline::{Asset, Pipeline};
use crate::scheduler::state_manager::{ReadOnlyStateManager, StateManager};
use crate::scheduler::task_info::{ScheduledAsset, TaskInfo, TaskState};

/// Scheduler holds a copy of the pipeline's assets plus the mutable run-state
/// overlay (one [`TaskState`] per asset).
///
/// It is responsible for:
/// - narrowing the run by excluding assets (before execution starts)
/// - deciding which pending asset is ready to run (upstreams satisfied)
/// - recording succeeded/failed outcomes
/// - skipping everything downstream of a failure
///
/// Mutating methods take `&mut self`; during execution the scheduler is owned
/// by the runtime's event loop, which is its only writer.
pub struct Scheduler {
    assets: Vec<Asset>,
    tasks: Vec<TaskInfo>,
    index: HashMap<TaskName, usize>,
    logger: SharedLogger,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Build the overlay for `pipeline` with every asset `Pending`.
    ///
    /// `logger` receives human-readable progress; `None` discards it.
    pub fn new(logger: SharedLogger, pipeline: &Pipeline) -> Self {
        let graph = pipeline.graph();
        let assets = pipeline.assets().to_vec();

        let tasks = assets
            .iter()
            .enumerate()
            .map(|(i, asset)| TaskInfo {
                name: asset.name.clone(),
                index: i,
                upstreams: graph.upstream_indices(i),
                downstreams: graph.downstream_indices(i),
                state: TaskState::Pending,
            })
            .collect::<Vec<_>>();

        let mut index = HashMap::with_capacity(tasks.len());
        for task in &tasks {
            index.entry(task.name.clone()).or_insert(task.index);
        }

        debug!(
            pipeline = %pipeline.name,
            assets = tasks.len(),
            "scheduler: built run-state overlay"
        );

        Self {
            assets,
            tasks,
            index,
            logger,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current state of the named asset.
    pub fn state_of(&self, name: &str) -> Option<TaskState> {
        self.index.get(name).map(|&i| self.tasks[i].state)
    }

    /// `(name, state)` for every asset, in pipeline order.
    pub fn states(&self) -> Vec<(TaskName, TaskState)> {
        self.tasks
            .iter()
            .map(|t| (t.name.clone(), t.state))
            .collect()
    }

    pub fn count_in(&self, state: TaskState) -> usize {
        self.tasks.iter().filter(|t| t.state == state).count()
    }

    /// Whether all upstreams of the named asset are satisfied.
    ///
    /// Returns `None` if the asset is unknown.
    pub fn deps_satisfied(&self, name: &str) -> Option<bool> {
        let idx = *self.index.get(name)?;
        Some(ReadOnlyStateManager::new(&self.tasks).deps_satisfied(idx))
    }

    /// Move the named asset from `Pending` to `Excluded`.
    ///
    /// Returns `true` only if this call changed its state.
    pub fn exclude(&mut self, name: &str) -> bool {
        match self.index.get(name) {
            Some(&idx) => StateManager::new(&mut self.tasks, &self.logger).exclude(idx),
            None => {
                warn!(asset = %name, "exclude for unknown asset; ignoring");
                false
            }
        }
    }

    /// Take the next ready asset and mark it `Running`.
    pub fn next_ready(&mut self) -> Option<ScheduledAsset> {
        let idx = StateManager::new(&mut self.tasks, &self.logger).start_next_ready()?;
        Some(ScheduledAsset {
            name: self.tasks[idx].name.clone(),
            index: idx,
            asset: self.assets[idx].clone(),
        })
    }

    /// Record the outcome of a running asset.
    ///
    /// On failure every pending asset downstream of it is skipped; the names
    /// of those assets are returned.
    pub fn mark_finished(&mut self, name: &str, outcome: TaskOutcome) -> Vec<TaskName> {
        let Some(&idx) = self.index.get(name) else {
            warn!(asset = %name, "completion for unknown asset; ignoring");
            return Vec::new();
        };
        self.finish_index(idx, outcome)
    }

    /// Like [`mark_finished`](Self::mark_finished) but by pipeline position,
    /// which stays unambiguous when names are duplicated.
    pub fn finish_index(&mut self, idx: usize, outcome: TaskOutcome) -> Vec<TaskName> {
        let mut manager = StateManager::new(&mut self.tasks, &self.logger);
        let succeeded = outcome == TaskOutcome::Success;
        if !manager.finish(idx, succeeded) {
            return Vec::new();
        }

        if succeeded {
            debug!(asset = %self.tasks[idx].name, "asset succeeded");
            return Vec::new();
        }

        let skipped = manager.mark_dependents_skipped(idx);
        warn!(
            asset = %self.tasks[idx].name,
            ?outcome,
            skipped = skipped.len(),
            "asset failed; skipping downstream assets"
        );
        skipped
    }

    pub fn has_running(&self) -> bool {
        self.tasks.iter().any(|t| t.state == TaskState::Running)
    }

    /// Whether every asset reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.state.is_terminal())
    }
}
