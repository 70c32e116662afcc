// src/exec/task_runner.rs

//! Process-backed task runner.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::TaskOutcome;
use crate::exec::backend::TaskRunner;
use crate::exec::clean::clean;
use crate::logging::{emit, SharedLogger};
use crate::pipeline::AssetType;
use crate::scheduler::ScheduledAsset;

/// Runs Python and shell assets as local processes.
///
/// Output lines are cleaned of escape codes and forwarded to the logger as
/// `[asset] >> line`. `empty` assets succeed immediately. Other asset types
/// need a query engine or connector and are reported as execution errors.
#[derive(Clone)]
pub struct CommandRunner {
    logger: SharedLogger,
}

impl CommandRunner {
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }

    fn command_for(&self, kind: AssetType, file: &Path) -> Option<Command> {
        let program = match kind {
            AssetType::Python => "python3",
            AssetType::Shell => "sh",
            _ => return None,
        };
        let mut cmd = Command::new(program);
        cmd.arg(file);
        Some(cmd)
    }

    async fn run_inner(&self, task: ScheduledAsset) -> Result<TaskOutcome> {
        let kind = task
            .asset
            .kind()
            .ok_or_else(|| anyhow!("unsupported asset type '{}'", task.asset.asset_type))?;

        if kind == AssetType::Empty {
            debug!(asset = %task.name, "empty asset; nothing to run");
            return Ok(TaskOutcome::Success);
        }

        let file = task
            .asset
            .executable_file
            .as_deref()
            .ok_or_else(|| anyhow!("asset '{}' has no executable file", task.name))?;

        let mut cmd = self
            .command_for(kind, file)
            .ok_or_else(|| anyhow!("no local runner for asset type '{kind}'"))?;

        info!(asset = %task.name, file = %file.display(), "starting asset process");

        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for asset '{}'", task.name))?;

        let stdout = child.stdout.take().map(|s| {
            tokio::spawn(forward_lines(BufReader::new(s), task.name.clone(), self.logger.clone()))
        });
        let stderr = child.stderr.take().map(|s| {
            tokio::spawn(forward_lines(BufReader::new(s), task.name.clone(), self.logger.clone()))
        });

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process of asset '{}'", task.name))?;

        // Drain remaining output before reporting the outcome.
        for handle in [stdout, stderr].into_iter().flatten() {
            let _ = handle.await;
        }

        let code = status.code().unwrap_or(-1);
        info!(
            asset = %task.name,
            exit_code = code,
            success = status.success(),
            "asset process exited"
        );

        Ok(if status.success() {
            TaskOutcome::Success
        } else {
            TaskOutcome::Failed(code)
        })
    }
}

impl TaskRunner for CommandRunner {
    fn run_asset(
        &self,
        task: ScheduledAsset,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>> {
        Box::pin(self.run_inner(task))
    }
}

async fn forward_lines<R>(reader: R, asset: String, logger: SharedLogger)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Ok(Some(line)) = lines.next_line().await {
        emit(&logger, &format!("[{asset}] >> {}", clean(&line)));
    }
}
