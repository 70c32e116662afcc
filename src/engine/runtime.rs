// src/engine/runtime.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::TaskRunner;
use crate::scheduler::{ScheduledAsset, Scheduler, TaskState};

use super::{AssetRunState, RunResult, RuntimeEvent, RuntimeOptions, TaskOutcome};

/// Drives the scheduler until every asset is terminal (or the run is
/// cancelled), delegating actual execution to a [`TaskRunner`].
///
/// The runtime owns the scheduler for the whole execution phase, so every
/// state transition happens on this one loop. Workers only run assets and
/// hand their outcome back through the join set.
pub struct Runtime {
    scheduler: Scheduler,
    runner: Arc<dyn TaskRunner>,
    options: RuntimeOptions,
    event_tx: mpsc::Sender<RuntimeEvent>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(scheduler: Scheduler, runner: Arc<dyn TaskRunner>, options: RuntimeOptions) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);
        Self {
            scheduler,
            runner,
            options,
            event_tx,
            event_rx,
        }
    }

    /// Sender for [`RuntimeEvent`]s, e.g. to cancel the run from a signal
    /// handler.
    pub fn event_sender(&self) -> mpsc::Sender<RuntimeEvent> {
        self.event_tx.clone()
    }

    /// Main loop.
    ///
    /// - Starts ready assets while fewer than `workers` are running.
    /// - Feeds each finished asset's outcome back into the scheduler.
    /// - After cancellation, dispatches nothing new and waits for running
    ///   assets; untouched assets stay `Pending`.
    pub async fn run(mut self) -> Result<RunResult> {
        let workers = self.options.workers.max(1);
        info!(workers, assets = self.scheduler.len(), "runtime started");

        let mut in_flight: JoinSet<TaskOutcome> = JoinSet::new();
        let mut names: HashMap<Id, ScheduledAsset> = HashMap::new();
        let mut cancelled = false;

        loop {
            while let Ok(event) = self.event_rx.try_recv() {
                cancelled |= self.handle_event(event);
            }

            if !cancelled {
                self.dispatch_ready(&mut in_flight, &mut names, workers);
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                Some(joined) = in_flight.join_next_with_id() => {
                    let (id, outcome) = match joined {
                        Ok((id, outcome)) => (id, outcome),
                        Err(err) => {
                            error!(error = %err, "asset worker panicked or was aborted");
                            (err.id(), TaskOutcome::Failed(-1))
                        }
                    };
                    if let Some(task) = names.remove(&id) {
                        debug!(asset = %task.name, ?outcome, "asset finished");
                        self.scheduler.finish_index(task.index, outcome);
                    }
                }
                Some(event) = self.event_rx.recv() => {
                    cancelled |= self.handle_event(event);
                }
                else => break,
            }
        }

        if cancelled {
            info!(
                pending = self.scheduler.count_in(TaskState::Pending),
                "run cancelled; pending assets were not started"
            );
        } else if !self.scheduler.is_finished() {
            warn!(
                pending = self.scheduler.count_in(TaskState::Pending),
                "no runnable assets left but some are still pending"
            );
        }

        let result = RunResult {
            states: self
                .scheduler
                .states()
                .into_iter()
                .map(|(name, state)| AssetRunState { name, state })
                .collect(),
            cancelled,
        };

        info!(
            success = result.is_success(),
            succeeded = result.count(TaskState::Succeeded),
            failed = result.count(TaskState::Failed),
            skipped = result.count(TaskState::Skipped),
            excluded = result.count(TaskState::Excluded),
            "runtime exiting"
        );

        Ok(result)
    }

    /// Returns `true` if the event cancels the run.
    fn handle_event(&mut self, event: RuntimeEvent) -> bool {
        match event {
            RuntimeEvent::CancelRequested => {
                info!("cancellation requested; no new assets will be started");
                true
            }
        }
    }

    fn dispatch_ready(
        &mut self,
        in_flight: &mut JoinSet<TaskOutcome>,
        names: &mut HashMap<Id, ScheduledAsset>,
        workers: usize,
    ) {
        while in_flight.len() < workers {
            let Some(task) = self.scheduler.next_ready() else {
                break;
            };

            debug!(asset = %task.name, running = in_flight.len() + 1, "dispatching asset");

            let runner = Arc::clone(&self.runner);
            let job = task.clone();
            let handle = in_flight.spawn(async move {
                let name = job.name.clone();
                match runner.run_asset(job).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        error!(asset = %name, error = %err, "asset execution error");
                        TaskOutcome::Failed(-1)
                    }
                }
            });
            names.insert(handle.id(), task);
        }
    }
}
