//! Chromium-backed browser sessions using chromiumoxide.

use super::{NavigateOptions, PageSession, SessionManager};
use crate::error::ScrapeError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Requests allowed to remain in flight while the page still counts as idle.
/// Chapter pages keep a couple of lazy-loading connections open forever, so
/// idle cannot mean zero.
const IDLE_MAX_INFLIGHT: usize = 2;

/// How long the network must stay at or below the threshold before the page
/// is considered loaded.
const IDLE_WINDOW: Duration = Duration::from_millis(500);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. PAGELIFT_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("PAGELIFT_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.pagelift/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".pagelift/chromium/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".pagelift/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".pagelift/chromium/chrome-linux64/chrome"),
                home.join(".pagelift/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches one headless Chromium instance per acquired session.
#[derive(Default)]
pub struct ChromiumSessionManager;

impl ChromiumSessionManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionManager for ChromiumSessionManager {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
        let chrome_path = find_chromium().ok_or_else(|| {
            ScrapeError::Launch(
                "Chromium not found; set PAGELIFT_CHROMIUM_PATH or install google-chrome".into(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| ScrapeError::Launch(format!("failed to build browser config: {e}")))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // Drain CDP events for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler_task.abort();
                return Err(ScrapeError::Launch(format!("failed to open page: {e}")));
            }
        };

        debug!("chromium session launched");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
        }))
    }
}

/// A single headless Chromium page, exclusively owned by one invocation.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(
        &mut self,
        address: &str,
        options: &NavigateOptions,
    ) -> Result<(), ScrapeError> {
        let override_ua = SetUserAgentOverrideParams::builder()
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(ScrapeError::Navigation)?;
        self.page
            .execute(override_ua)
            .await
            .map_err(|e| ScrapeError::Navigation(format!("failed to set user agent: {e}")))?;

        // Network events only flow once the domain is enabled, and the
        // listeners must be installed before goto so no request is missed.
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| ScrapeError::Navigation(format!("failed to enable network events: {e}")))?;

        let mut started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        let mut finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        let mut failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        let page = &self.page;
        let settle = async move {
            page.goto(address)
                .await
                .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

            // networkidle2: done once at most IDLE_MAX_INFLIGHT requests have
            // been outstanding for a full IDLE_WINDOW. Any event restarts the
            // window.
            let mut in_flight: usize = 0;
            loop {
                let idle = in_flight <= IDLE_MAX_INFLIGHT;
                tokio::select! {
                    Some(_) = started.next() => in_flight += 1,
                    Some(_) = finished.next() => in_flight = in_flight.saturating_sub(1),
                    Some(_) = failed.next() => in_flight = in_flight.saturating_sub(1),
                    _ = tokio::time::sleep(IDLE_WINDOW), if idle => break,
                    else => break,
                }
            }
            Ok(())
        };

        with_deadline(options.timeout, settle).await?;
        debug!(%address, "page loaded and network idle");
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScrapeError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScrapeError::Extraction(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| ScrapeError::Extraction(format!("failed to convert script result: {e}")))
    }

    async fn close(self: Box<Self>) {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
        } = *self;

        if let Err(e) = page.close().await {
            debug!(error = %e, "page close failed");
        }
        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        let _ = browser.wait().await;
        handler_task.abort();
        debug!("chromium session released");
    }
}

/// Bound a navigation future, mapping expiry to a timeout failure.
async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, ScrapeError>
where
    F: Future<Output = Result<T, ScrapeError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::Navigation(format!(
            "did not reach network idle within {}ms",
            timeout.as_millis()
        ))),
    }
}
