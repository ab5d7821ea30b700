use crate::config::ConfigError;
use crate::export::convert::convert_task;
use crate::export::task::ExportTask;
use crate::render::PageRenderer;
use crate::retry::RetryPolicy;
use crate::transcode::ArtifactTranscoder;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Per-run accounting from the bounded runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunOutcome {
    pub exported: usize,
    pub failed: usize,
}

/// Execute all tasks concurrently, capped at `parallel` conversions.
///
/// Every task is launched up front; each unit acquires a semaphore permit
/// before invoking the converter and releases it on drop, success or
/// failure, so at most `parallel` conversions run at any instant. Tasks
/// are independent: one task's failure is logged and counted but never
/// cancels or blocks siblings, and no ordering between tasks is
/// guaranteed. Returns once every task has finished.
///
/// The only failure mode of the runner itself is an invalid concurrency
/// limit, rejected before any task launches.
pub async fn run_all(
    tasks: Vec<ExportTask>,
    parallel: usize,
    renderer: Arc<dyn PageRenderer>,
    transcoder: Arc<dyn ArtifactTranscoder>,
    policy: RetryPolicy,
) -> Result<RunOutcome, ConfigError> {
    if parallel == 0 {
        return Err(ConfigError::InvalidParallel("0".to_string()));
    }

    let total = tasks.len();
    let semaphore = Arc::new(Semaphore::new(parallel));
    let mut units = JoinSet::new();

    for task in tasks {
        let semaphore = Arc::clone(&semaphore);
        let renderer = Arc::clone(&renderer);
        let transcoder = Arc::clone(&transcoder);
        units.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed while units are running; if
                // that ever changes the dropped task must not go unnoticed.
                Err(e) => {
                    tracing::error!(
                        task = %task.display_name,
                        error = %e,
                        "Concurrency pool closed before the task could run"
                    );
                    return false;
                }
            };
            convert_task(renderer.as_ref(), transcoder.as_ref(), &task, &policy)
                .await
                .is_ok()
        });
    }

    let mut outcome = RunOutcome::default();
    while let Some(joined) = units.join_next().await {
        match joined {
            Ok(true) => outcome.exported += 1,
            Ok(false) => outcome.failed += 1,
            Err(e) => {
                tracing::error!(error = %e, "Export unit aborted unexpectedly");
                outcome.failed += 1;
            }
        }
    }

    tracing::info!(
        total = total,
        exported = outcome.exported,
        failed = outcome.failed,
        "All export tasks finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PageRenderer, RenderContext, RenderError};
    use crate::transcode::{ArtifactTranscoder, TranscodeError};
    use async_trait::async_trait;
    use std::path::Path;

    struct NoopRenderer;
    struct NoopContext;

    #[async_trait]
    impl PageRenderer for NoopRenderer {
        async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
            Ok(Box::new(NoopContext))
        }
    }

    #[async_trait]
    impl RenderContext for NoopContext {
        async fn navigate(&self, _url: &str) -> Result<(), RenderError> {
            Ok(())
        }
        async fn save_artifact(&self, _path: &Path) -> Result<(), RenderError> {
            Ok(())
        }
        async fn close(&self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    struct NoopTranscoder;

    #[async_trait]
    impl ArtifactTranscoder for NoopTranscoder {
        async fn extract_text(&self, _artifact: &Path) -> Result<String, TranscodeError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_zero_parallel_rejected_before_launch() {
        let result = run_all(
            Vec::new(),
            0,
            Arc::new(NoopRenderer),
            Arc::new(NoopTranscoder),
            RetryPolicy::default(),
        )
        .await;
        assert!(matches!(result, Err(ConfigError::InvalidParallel(_))));
    }

    #[tokio::test]
    async fn test_empty_task_set_completes() {
        let outcome = run_all(
            Vec::new(),
            4,
            Arc::new(NoopRenderer),
            Arc::new(NoopTranscoder),
            RetryPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.exported, 0);
        assert_eq!(outcome.failed, 0);
    }
}
