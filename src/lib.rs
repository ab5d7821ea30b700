//! feedsnap: export feed articles to Markdown via headless Chrome.
//!
//! The pipeline fetches an RSS feed, keeps the entries whose publication
//! timestamp matches a caller-supplied date key, expands each kept entry
//! into one export task per link, drops tasks whose output document already
//! exists, and converts the remainder concurrently under a semaphore-bounded
//! ceiling. Each conversion renders the live page to a PDF artifact in an
//! isolated browser context, extracts the text into the final `.md` file,
//! and removes the artifact.
//!
//! # Architecture
//!
//! ```text
//! feed::fetch_feed → export::plan_tasks → export::skip_existing → export::run_all
//!                                                                      │
//!                                              N × export::convert_task (retry-wrapped)
//! ```
//!
//! The browser and the PDF transcoder sit behind the [`render::PageRenderer`]
//! and [`transcode::ArtifactTranscoder`] traits so the orchestration layer is
//! testable without Chrome.

pub mod config;
pub mod export;
pub mod feed;
pub mod render;
pub mod retry;
pub mod transcode;
pub mod util;
