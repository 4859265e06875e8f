//! Browser session abstraction.
//!
//! Defines the `SessionManager` and `PageSession` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). The pipeline
//! only ever talks to these traits, so tests can substitute a faked browser
//! capability.

pub mod chromium;

use crate::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;

/// Options applied when loading a page.
#[derive(Debug, Clone)]
pub struct NavigateOptions {
    /// Identity string sent with the request.
    pub user_agent: String,
    /// Upper bound on the whole load-and-settle wait.
    pub timeout: Duration,
}

/// Owns the lifecycle of browser sessions: one acquire, one release,
/// nothing shared between invocations.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Start a browser and hand back a live session, or fail with
    /// [`ScrapeError::Launch`] if the engine cannot start.
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError>;

    /// Tear the session down. Consumes the handle, so a session cannot be
    /// released twice; safe to call after a failed navigate or extract.
    async fn release(&self, session: Box<dyn PageSession>) {
        session.close().await;
    }
}

/// A single live browser page.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Load `address` with the given options, waiting for network-idle
    /// quiescence. Fails with [`ScrapeError::Navigation`] on timeout or
    /// network-level failure.
    async fn navigate(&mut self, address: &str, options: &NavigateOptions)
        -> Result<(), ScrapeError>;

    /// Execute a script in the page's own context and return its value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScrapeError>;

    /// Close the page and shut the browser down, ignoring errors from an
    /// already-broken session.
    async fn close(self: Box<Self>);
}
