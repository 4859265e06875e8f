//! Error taxonomy for the scrape pipeline.

use thiserror::Error;

/// Everything that can go wrong during one scrape attempt.
///
/// The pipeline catches all variants and folds them into
/// [`ScrapeOutcome::Failure`](crate::pipeline::ScrapeOutcome); the phase that
/// failed survives only in the message text, never as a distinguishable type
/// to callers.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("image extraction failed: {0}")]
    Extraction(String),

    #[error("scrape failed: {0}")]
    Unclassified(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unclassified(format!("{err:#}"))
    }
}
