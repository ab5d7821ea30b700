//! The page renderer collaborator.
//!
//! The export pipeline never talks to a browser directly; it goes through
//! [`PageRenderer`], which hands out isolated [`RenderContext`]s. One
//! context is opened per export task and closed by that task on every exit
//! path, so context lifetimes never overlap in ownership. The production
//! implementation is [`chrome::ChromeRenderer`]; tests substitute mocks.

mod chrome;

pub use chrome::ChromeRenderer;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser process could not be started.
    #[error("failed to launch renderer: {0}")]
    Launch(String),
    /// A new rendering context could not be opened.
    #[error("failed to open rendering context: {0}")]
    Context(String),
    /// Navigation to the target URL failed or did not settle.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    /// The rendered page could not be materialized as an artifact.
    #[error("failed to save artifact at {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },
    /// Context or browser teardown failed.
    #[error("renderer teardown failed: {0}")]
    Shutdown(String),
}

/// A shared rendering engine that can open isolated contexts.
///
/// One engine instance serves the whole run; contexts are per-task.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError>;
}

/// An isolated, independently closable browsing session.
///
/// Callers must invoke [`close`](RenderContext::close) exactly once when
/// done with the context, on both success and failure paths.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate the context to `url` and wait for the page to settle.
    async fn navigate(&self, url: &str) -> Result<(), RenderError>;

    /// Materialize the current view as a fixed-layout binary artifact.
    async fn save_artifact(&self, path: &Path) -> Result<(), RenderError>;

    /// Close this context. Idempotence is not required; call once.
    async fn close(&self) -> Result<(), RenderError>;
}
