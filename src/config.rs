// src/config.rs
// =============================================================================
// Process-wide scraper settings.
//
// Built once in main (from CLI flags / environment variables), wrapped in an
// Arc, and only read after that. Every run, including concurrent runs behind
// the HTTP endpoint, sees the same values.
// =============================================================================

use std::time::Duration;

/// Listing host the search pages are fetched from
pub const DEFAULT_BASE_URL: &str = "https://listado.mercadolibre.com.co";

/// Identification header sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Pause between two consecutive pages of the same run
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub page_delay: Duration,
}

impl ScraperConfig {
    pub fn new(base_url: &str, timeout_secs: u64, page_delay_ms: u64) -> Self {
        Self {
            // A trailing slash would produce "//" in the page address
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            page_delay: Duration::from_millis(page_delay_ms),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_PAGE_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert_eq!(config.base_url, "https://listado.mercadolibre.com.co");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.page_delay, Duration::from_secs(2));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ScraperConfig::new("http://127.0.0.1:9000/", 1, 0);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }
}
