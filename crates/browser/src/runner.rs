//! Running capture tasks one after another.

use std::path::PathBuf;

use {
    async_trait::async_trait,
    tracing::{debug, error, info},
};

use crate::{error::CaptureError, types::CaptureTask};

/// Takes a single screenshot and returns where it was written.
#[async_trait]
pub trait Capturer: Send + Sync {
    async fn capture(&self, task: &CaptureTask) -> Result<PathBuf, CaptureError>;
}

/// Run `tasks` strictly in order, each to completion before the next starts.
///
/// Stops at the first failure; later tasks are not attempted. Returns the
/// written paths in task order.
pub async fn run_tasks(
    capturer: &dyn Capturer,
    tasks: Vec<CaptureTask>,
) -> Result<Vec<PathBuf>, CaptureError> {
    let total = tasks.len();
    let mut written = Vec::with_capacity(total);

    for (index, task) in tasks.into_iter().enumerate() {
        debug!(task = index + 1, total, preset = task.preset, "starting capture");

        let path = capturer.capture(&task).await.inspect_err(|e| {
            error!(
                task = index + 1,
                total,
                preset = task.preset,
                error = %e,
                "capture failed, aborting run"
            );
        })?;
        written.push(path);
    }

    info!(captured = written.len(), "all captures finished");
    Ok(written)
}
