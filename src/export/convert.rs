use crate::export::task::ExportTask;
use crate::render::{PageRenderer, RenderContext, RenderError};
use crate::retry::RetryPolicy;
use crate::transcode::{ArtifactTranscoder, TranscodeError};
use std::path::Path;
use thiserror::Error;

/// Extension of the intermediate binary artifact.
const ARTIFACT_EXT: &str = "pdf";

/// Extension of the staging file the document is written to before being
/// renamed onto its final path.
const STAGING_EXT: &str = "md.tmp";

/// Errors from a single task's render-and-transcode section.
///
/// All variants are treated as transient within the task's retry policy;
/// once retries are exhausted the task degrades to a logged failure without
/// affecting siblings.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert one task's URL into its output document.
///
/// Opens a fresh rendering context, then retries the navigate → save →
/// transcode section under `policy`. The context is closed on every exit
/// path, and the intermediate artifact is removed once transcoding has
/// been attempted, so neither contexts nor temp files leak across retries
/// or runs. On failure no file is left at the task's output path, so a
/// later run picks the task up again through the dedup check.
pub async fn convert_task(
    renderer: &dyn PageRenderer,
    transcoder: &dyn ArtifactTranscoder,
    task: &ExportTask,
    policy: &RetryPolicy,
) -> Result<(), ConvertError> {
    tracing::info!(
        task = %task.display_name,
        url = %task.url,
        output = %task.output_path.display(),
        "Starting export task"
    );

    let artifact_path = task.output_path.with_extension(ARTIFACT_EXT);
    let ctx = renderer.open_context().await?;

    let ctx_ref: &dyn RenderContext = ctx.as_ref();
    let artifact = artifact_path.as_path();
    let result = policy
        .run(move || attempt(ctx_ref, transcoder, task, artifact))
        .await;

    // Scoped acquisition: the context closes regardless of outcome.
    if let Err(e) = ctx.close().await {
        tracing::warn!(task = %task.display_name, error = %e, "Failed to close rendering context");
    }

    match &result {
        Ok(()) => {
            tracing::info!(task = %task.display_name, output = %task.output_path.display(), "Export task done");
        }
        Err(e) => {
            tracing::error!(task = %task.display_name, url = %task.url, error = %e, "Export task failed");
        }
    }
    result
}

/// One attempt of the retried section: render the page to the artifact,
/// extract its text, write the output document.
async fn attempt(
    ctx: &dyn RenderContext,
    transcoder: &dyn ArtifactTranscoder,
    task: &ExportTask,
    artifact_path: &Path,
) -> Result<(), ConvertError> {
    tracing::debug!(task = %task.display_name, state = "rendering", "Navigating");
    ctx.navigate(&task.url).await?;
    ctx.save_artifact(artifact_path).await?;

    tracing::debug!(task = %task.display_name, state = "converting", "Extracting text");
    let extracted = transcoder.extract_text(artifact_path).await;

    // Remove the artifact once transcoding has been attempted, even if it
    // failed, so temp files never accumulate across retries.
    remove_quietly(artifact_path).await;

    let text = extracted?;
    write_document(&task.output_path, &text).await
}

/// Write the document to a staging file and rename it onto the final path.
///
/// The output path doubles as the dedup ledger, so it must never hold a
/// partial file: a write that fails midway (disk full, for instance) would
/// otherwise be mistaken for a completed export on every later run. The
/// rename is atomic on the same filesystem; on any failure the staging
/// file is removed and nothing appears at the ledger path.
async fn write_document(path: &Path, text: &str) -> Result<(), ConvertError> {
    let staging = path.with_extension(STAGING_EXT);
    if let Err(e) = tokio::fs::write(&staging, text).await {
        remove_quietly(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        remove_quietly(&staging).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
        }
    }
}
