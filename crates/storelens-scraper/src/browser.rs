//! Heavy tier: headless Chromium driven through chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use storelens_core::AppConfig;
use tokio::task::JoinHandle;

use crate::error::ScraperError;
use crate::navigator::{BrowserLauncher, BrowserSession, PageAction, PageNavigator};

/// Launches one isolated Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    chromium_path: Option<PathBuf>,
    headless: bool,
    user_agent: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl ChromiumLauncher {
    /// Heavy-tier launcher using the configured timeouts.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chromium_path: config.chromium_path.clone(),
            headless: config.headless,
            user_agent: config.user_agent.clone(),
            navigation_timeout: Duration::from_secs(config.heavy_timeout_secs),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }

    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--user-agent={}", self.user_agent))
            .window_size(1920, 1080);
        if let Some(path) = &self.chromium_path {
            builder = builder.chrome_executable(path);
        }
        if !self.headless {
            builder = builder.with_head();
        }
        builder
            .build()
            .map_err(|e| ScraperError::Browser(format!("failed to build browser config: {e}")))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Browser(format!("failed to launch Chromium: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(headless = self.headless, "launched Chromium session");

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            navigation_timeout: self.navigation_timeout,
            settle_delay: self.settle_delay,
        }))
    }
}

/// A running Chromium process. Each [`PageNavigator::load`] opens a fresh
/// tab, navigates, waits the settle delay and returns the rendered DOM.
///
/// Dropping the session aborts the CDP handler and chromiumoxide kills the
/// child process, so cancellation never leaks a browser.
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl ChromiumSession {
    async fn render(&self, url: &str, actions: &[PageAction]) -> Result<String, ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::Browser(format!("failed to open tab: {e}")))?;

        let rendered = async {
            match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    return Err(ScraperError::Browser(format!(
                        "navigation to {url} failed: {e}"
                    )));
                }
                Err(_) => {
                    return Err(ScraperError::NavigationTimeout {
                        url: url.to_owned(),
                        timeout_secs: self.navigation_timeout.as_secs(),
                    });
                }
            }
            tokio::time::sleep(self.settle_delay).await;
            for action in actions {
                perform(&page, action).await;
            }
            page.content()
                .await
                .map_err(|e| ScraperError::Browser(format!("failed to read DOM of {url}: {e}")))
        }
        .await;

        if let Err(e) = page.close().await {
            tracing::debug!(url, error = %e, "failed to close tab");
        }
        rendered
    }
}

/// Runs one action. A failed or unmatched step is logged and skipped so the
/// DOM can still be read.
async fn perform(page: &Page, action: &PageAction) {
    let script = action.script();
    for _ in 0..action.repetitions() {
        match page.evaluate(script.as_str()).await {
            Ok(result) => {
                if !result.into_value::<bool>().unwrap_or(false) {
                    tracing::debug!(?action, "page action matched no element");
                    return;
                }
            }
            Err(e) => {
                tracing::debug!(?action, error = %e, "page action failed");
                return;
            }
        }
        tokio::time::sleep(action.wait()).await;
    }
}

#[async_trait]
impl PageNavigator for ChromiumSession {
    async fn load(&self, url: &str) -> Result<String, ScraperError> {
        self.render(url, &[]).await
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn load_with(
        &self,
        url: &str,
        actions: &[PageAction],
    ) -> Result<String, ScraperError> {
        self.render(url, actions).await
    }

    async fn close(self: Box<Self>) {
        let mut session = self;
        if let Err(e) = session.browser.close().await {
            tracing::warn!(error = %e, "failed to close Chromium cleanly");
        }
        if let Err(e) = session.browser.wait().await {
            tracing::debug!(error = %e, "failed to reap Chromium process");
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
