//! Scrape configuration and its defaults.

/// Default upper bound on the navigate-and-settle wait, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Desktop Chrome identity string sent with every page load. Chapter hosts
/// drop requests that do not look like a real browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Per-invocation configuration for the scrape pipeline.
///
/// The content container selector and the placeholder sentinel are fixed
/// constants in [`crate::extract`], not configurable here.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Abort navigation if the page has not settled within this many ms.
    pub timeout_ms: u64,
    /// Identity string applied to the browser session before loading.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Apply per-request overrides, keeping the base value for absent fields.
    pub fn with_overrides(&self, timeout_ms: Option<u64>, user_agent: Option<String>) -> Self {
        Self {
            timeout_ms: timeout_ms.unwrap_or(self.timeout_ms),
            user_agent: user_agent.unwrap_or_else(|| self.user_agent.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_overrides_keep_base_for_absent_fields() {
        let base = ScrapeConfig::default();

        let config = base.with_overrides(Some(5_000), None);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.user_agent, base.user_agent);

        let config = base.with_overrides(None, Some("TestBot/1.0".into()));
        assert_eq!(config.timeout_ms, base.timeout_ms);
        assert_eq!(config.user_agent, "TestBot/1.0");
    }
}
