//! The artifact transcoder collaborator: binary artifact in, text out.
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("text extraction failed for {path}: {reason}")]
pub struct TranscodeError {
    pub path: PathBuf,
    pub reason: String,
}

/// Converts a fixed-layout binary artifact into plain text content.
#[async_trait]
pub trait ArtifactTranscoder: Send + Sync {
    async fn extract_text(&self, artifact: &Path) -> Result<String, TranscodeError>;
}

/// PDF transcoder backed by `pdf-extract`.
///
/// Extraction is CPU-bound and synchronous, so it runs on the blocking
/// thread pool rather than stalling the scheduler.
pub struct PdfTranscoder;

#[async_trait]
impl ArtifactTranscoder for PdfTranscoder {
    async fn extract_text(&self, artifact: &Path) -> Result<String, TranscodeError> {
        let path = artifact.to_path_buf();
        let result = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&path).map_err(|e| TranscodeError {
                path: path.clone(),
                reason: e.to_string(),
            })
        })
        .await;

        match result {
            Ok(extracted) => extracted,
            Err(join_err) => Err(TranscodeError {
                path: artifact.to_path_buf(),
                reason: format!("extraction task failed: {join_err}"),
            }),
        }
    }
}
