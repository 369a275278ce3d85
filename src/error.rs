// src/error.rs
// =============================================================================
// Errors produced by the scraping core.
//
// Two families:
// - Per-page errors (Network, HttpStatus, Extraction): the orchestrator turns
//   these into a failed page report and moves on to the next page
// - Invocation errors: the caller asked for something we can't run (blank
//   query, zero pages). These end the invocation before any request is made
//
// The application glue (main.rs, cli dispatch) uses anyhow on top of this.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection failed, timed out, or the body could not be read
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// A selector could not be compiled or the markup could not be handled
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The caller's request is not runnable
    #[error("invalid invocation: {0}")]
    Invocation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn is_invocation(&self) -> bool {
        matches!(self, ScrapeError::Invocation(_))
    }

    // Builds a Network error from a reqwest failure, keeping the reason short
    pub(crate) fn network(url: &str, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };

        ScrapeError::Network {
            url: url.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = ScrapeError::HttpStatus {
            url: "https://example.com/x?page=2".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com/x?page=2");
    }

    #[test]
    fn test_only_invocation_is_terminal() {
        assert!(ScrapeError::Invocation("missing query".into()).is_invocation());
        assert!(!ScrapeError::Extraction("bad selector".into()).is_invocation());
    }
}
