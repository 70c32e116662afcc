use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use assetdag::engine::TaskOutcome;
use assetdag::exec::TaskRunner;
use assetdag::scheduler::ScheduledAsset;

/// A fake task runner that:
/// - records which assets were "run", in start order
/// - fails (or errors) the assets it was told to
/// - optionally sleeps per asset, tracking peak concurrency
#[derive(Default)]
pub struct FakeRunner {
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
    erroring: HashSet<String>,
    delay: Option<Duration>,
    delays: HashMap<String, Duration>,
    running: AtomicUsize,
    peak: AtomicUsize,
    started: Option<mpsc::UnboundedSender<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `Failed(1)` for this asset.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Return an `Err` from the runner for this asset.
    pub fn erroring(mut self, name: &str) -> Self {
        self.erroring.insert(name.to_string());
        self
    }

    /// Sleep this long in every asset.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleep this long in one asset, overriding `with_delay`.
    pub fn with_delay_for(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Receive asset names as soon as they start.
    pub fn with_start_notifier(mut self) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.started = Some(tx);
        (self, rx)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Highest number of assets seen running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl TaskRunner for FakeRunner {
    fn run_asset(
        &self,
        task: ScheduledAsset,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<TaskOutcome>> + Send + '_>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(task.name.clone());
            if let Some(tx) = &self.started {
                let _ = tx.send(task.name.clone());
            }

            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(&task.name).copied().or(self.delay) {
                tokio::time::sleep(delay).await;
            }

            self.running.fetch_sub(1, Ordering::SeqCst);

            if self.erroring.contains(&task.name) {
                anyhow::bail!("fake runner error for {}", task.name);
            }
            if self.failing.contains(&task.name) {
                return Ok(TaskOutcome::Failed(1));
            }
            Ok(TaskOutcome::Success)
        })
    }
}

/// Run logger that keeps every message, for asserting on progress output.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl assetdag::logging::RunLogger for RecordingLogger {
    fn println(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
