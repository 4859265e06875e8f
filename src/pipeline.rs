//! Scrape pipeline — orchestrates session, navigation, and extraction into
//! one outcome.
//!
//! A run moves through launch → navigate → extract, releases the browser
//! session on every path, and reports a single [`ScrapeOutcome`]: callers
//! never see an unhandled fault, and a failure never carries partial image
//! data.

use crate::browser::{NavigateOptions, PageSession, SessionManager};
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract::{self, PageImage};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Ordered surviving images; empty when the container has no qualifying
    /// elements, which is not an error.
    Success(Vec<PageImage>),
    /// Human-readable description of what went wrong.
    Failure(String),
}

/// Fetches one page and extracts its image list.
pub struct Scraper {
    sessions: Arc<dyn SessionManager>,
    config: ScrapeConfig,
}

impl Scraper {
    pub fn new(sessions: Arc<dyn SessionManager>, config: ScrapeConfig) -> Self {
        Self { sessions, config }
    }

    /// Run the whole pipeline for `address`.
    ///
    /// The session is released exactly once on every exit path; any error
    /// from launch, navigation, or extraction is folded into
    /// [`ScrapeOutcome::Failure`] with the phase preserved in the message.
    pub async fn run(&self, address: &str) -> ScrapeOutcome {
        debug!(%address, "acquiring browser session");
        let mut session = match self.sessions.acquire().await {
            Ok(session) => session,
            Err(e) => {
                warn!(%address, error = %e, "scrape failed before a session existed");
                return ScrapeOutcome::Failure(e.to_string());
            }
        };

        let attempt = self.attempt(session.as_mut(), address).await;
        self.sessions.release(session).await;

        match attempt {
            Ok(images) => {
                info!(%address, count = images.len(), "scrape complete");
                ScrapeOutcome::Success(images)
            }
            Err(e) => {
                warn!(%address, error = %e, "scrape failed");
                ScrapeOutcome::Failure(e.to_string())
            }
        }
    }

    async fn attempt(
        &self,
        session: &mut dyn PageSession,
        address: &str,
    ) -> Result<Vec<PageImage>, ScrapeError> {
        let options = NavigateOptions {
            user_agent: self.config.user_agent.clone(),
            timeout: Duration::from_millis(self.config.timeout_ms),
        };

        debug!(%address, timeout_ms = self.config.timeout_ms, "navigating");
        session.navigate(address, &options).await?;

        debug!(%address, "page loaded, extracting images");
        extract::collect_images(&*session).await
    }
}
