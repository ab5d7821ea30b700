//! The export pipeline: filter, plan, dedup, and run conversions.
//!
//! The module is organized into five stages:
//!
//! - [`task`] - date-key filtering and per-link task expansion (pure)
//! - [`filename`] - deterministic, filesystem-safe output naming
//! - [`dedup`] - skipping tasks whose output document already exists
//! - [`runner`] - semaphore-bounded concurrent execution with failure
//!   isolation
//! - [`convert`] - per-task page rendering and text extraction under a
//!   retry policy
//!
//! [`run_export`] composes the stages into a whole run.

mod convert;
mod dedup;
mod filename;
mod runner;
mod task;

pub use convert::{convert_task, ConvertError};
pub use dedup::skip_existing;
pub use filename::output_filename;
pub use runner::{run_all, RunOutcome};
pub use task::{plan_tasks, ExportTask};

use crate::feed::{fetch_feed, FetchError};
use crate::render::PageRenderer;
use crate::retry::RetryPolicy;
use crate::transcode::ArtifactTranscoder;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Inputs for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Fully-formed feed endpoint URL.
    pub feed_url: String,
    /// Date-key prefix entries must match to be exported.
    pub date_key: String,
    /// Directory receiving the output documents.
    pub output_dir: PathBuf,
    /// Concurrency ceiling for conversions.
    pub parallel: usize,
}

/// Final accounting for a run.
#[derive(Debug, Clone, Copy)]
pub struct ExportSummary {
    pub exported: usize,
    pub failed: usize,
    /// Tasks dropped by the dedup check (output already present).
    pub skipped: usize,
}

/// Fatal pipeline errors. Per-task failures are not errors at this level;
/// they are counted in [`ExportSummary::failed`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Run the whole pipeline: fetch → filter/plan → dedup → bounded run.
pub async fn run_export(
    client: &reqwest::Client,
    renderer: Arc<dyn PageRenderer>,
    transcoder: Arc<dyn ArtifactTranscoder>,
    policy: RetryPolicy,
    opts: ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let channel = fetch_feed(client, &opts.feed_url).await?;

    let tasks = plan_tasks(&channel.entries, &opts.date_key, &channel.title, &opts.output_dir);
    tracing::info!(
        date_key = %opts.date_key,
        matched = tasks.len(),
        "Planned export tasks"
    );

    let (pending, skipped) = skip_existing(tasks);
    if skipped > 0 {
        tracing::info!(skipped = skipped, "Tasks skipped (output already exists)");
    }

    let outcome = run_all(pending, opts.parallel, renderer, transcoder, policy).await?;

    Ok(ExportSummary {
        exported: outcome.exported,
        failed: outcome.failed,
        skipped,
    })
}
