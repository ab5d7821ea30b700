use crate::render::{PageRenderer, RenderContext, RenderError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::Path;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Headless Chrome renderer over the Chrome DevTools Protocol.
///
/// One browser process serves the whole run; each [`open_context`] call
/// opens a fresh page (tab). The handle is owned by the top level, which
/// must call [`shutdown`](ChromeRenderer::shutdown) on every exit path —
/// teardown is explicit, not hooked on process exit.
pub struct ChromeRenderer {
    // RwLock so concurrent tasks can open pages in parallel; the write
    // side is only taken by shutdown.
    browser: RwLock<Option<Browser>>,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeRenderer {
    /// Launch the browser and start driving its CDP event stream.
    pub async fn launch() -> Result<Self, RenderError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(RenderError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // The handler stream must be polled for the browser to make progress.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "Browser event stream error");
                    break;
                }
            }
        });

        tracing::info!("Headless browser launched");
        Ok(Self {
            browser: RwLock::new(Some(browser)),
            event_loop: Mutex::new(Some(event_loop)),
        })
    }

    /// Close the browser process and stop the event loop.
    ///
    /// After shutdown, [`open_context`] fails with [`RenderError::Context`].
    pub async fn shutdown(&self) -> Result<(), RenderError> {
        let browser = self.browser.write().await.take();
        if let Some(mut browser) = browser {
            browser
                .close()
                .await
                .map_err(|e| RenderError::Shutdown(e.to_string()))?;
            if let Err(e) = browser.wait().await {
                tracing::debug!(error = %e, "Browser process did not exit cleanly");
            }
        }
        if let Some(event_loop) = self.event_loop.lock().await.take() {
            event_loop.abort();
        }
        tracing::info!("Headless browser shut down");
        Ok(())
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        let guard = self.browser.read().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| RenderError::Context("renderer already shut down".to_string()))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Context(e.to_string()))?;
        Ok(Box::new(ChromeContext { page }))
    }
}

struct ChromeContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromeContext {
    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        let to_nav_error = |e: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.page.goto(url).await.map_err(to_nav_error)?;
        self.page.wait_for_navigation().await.map_err(to_nav_error)?;
        Ok(())
    }

    async fn save_artifact(&self, path: &Path) -> Result<(), RenderError> {
        self.page
            .save_pdf(PrintToPdfParams::default(), path)
            .await
            .map_err(|e| RenderError::Artifact {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| RenderError::Shutdown(e.to_string()))
    }
}
