use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use feedsnap::config::RuntimeConfig;
use feedsnap::export::{run_export, ExportOptions};
use feedsnap::render::{ChromeRenderer, PageRenderer};
use feedsnap::retry::RetryPolicy;
use feedsnap::transcode::PdfTranscoder;
use feedsnap::util;

#[derive(Parser, Debug)]
#[command(
    name = "feedsnap",
    about = "Export feed articles to Markdown by rendering each page with headless Chrome"
)]
struct Args {
    /// Base URL of the feed platform (the feed is read from <url>/feed/all.rss)
    #[arg(short, long)]
    url: String,

    /// Publication date key of articles to export, e.g. 20260203
    #[arg(short, long)]
    date: String,

    /// Output directory for the exported documents
    #[arg(short, long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = RuntimeConfig::from_env()?;

    let base = util::validate_base_url(&args.url).context("Invalid --url")?;
    let date_key = util::validate_date_key(&args.date)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid --date")?
        .to_string();
    let feed_url = util::feed_endpoint(base.as_str());

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let client = reqwest::Client::new();
    let renderer = Arc::new(
        ChromeRenderer::launch()
            .await
            .context("Failed to launch the page renderer")?,
    );
    let transcoder = Arc::new(PdfTranscoder);

    let result = run_export(
        &client,
        Arc::clone(&renderer) as Arc<dyn PageRenderer>,
        transcoder,
        RetryPolicy::default(),
        ExportOptions {
            feed_url,
            date_key,
            output_dir: args.output.clone(),
            parallel: config.parallel,
        },
    )
    .await;

    // Teardown happens on both the success and the error path.
    if let Err(e) = renderer.shutdown().await {
        tracing::warn!(error = %e, "Renderer shutdown failed");
    }

    let summary = result.context("Export run failed")?;
    tracing::info!(
        exported = summary.exported,
        failed = summary.failed,
        skipped = summary.skipped,
        output = %args.output.display(),
        "Export run complete"
    );
    // Per-task failures do not fail the run; the failed tasks left no
    // output files, so the next run retries them via the dedup check.
    Ok(())
}
