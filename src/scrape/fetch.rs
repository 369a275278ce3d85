// src/scrape/fetch.rs
// =============================================================================
// This module downloads one page of search results.
//
// Key functionality:
// - Builds the page address: {base}/{form-encoded query}?page={n}
// - Makes exactly one HTTP GET per call (no retries, the orchestrator decides
//   what to do with failures)
// - Sends a browser-like User-Agent so the listing site doesn't reject us
// - Turns transport failures and non-2xx answers into typed errors
//
// The orchestrator talks to a `PageSource`, not to `PageFetcher` directly.
// That keeps the loop testable with a scripted source.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::form_urlencoded;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;

// One page's response body, handed from the fetcher to the extractor
#[derive(Debug, Clone)]
pub struct RawPage {
    /// 1-based page index this body belongs to
    pub page: u32,
    /// The address that was requested
    pub url: String,
    pub body: Vec<u8>,
}

/// Anything that can produce the raw body of a search-results page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Address the page would be fetched from (used in diagnostics)
    fn page_url(&self, query: &str, page: u32) -> String;

    async fn fetch(&self, query: &str, page: u32) -> Result<RawPage, ScrapeError>;
}

// The real, network-backed page source
//
// The reqwest Client is built once and reused for every page, so all pages of
// a run (and all runs sharing this fetcher) reuse pooled connections.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: String,
}

impl PageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ScrapeError::Network {
                url: config.base_url.clone(),
                message: format!("could not build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    fn page_url(&self, query: &str, page: u32) -> String {
        build_page_url(&self.base_url, query, page)
    }

    async fn fetch(&self, query: &str, page: u32) -> Result<RawPage, ScrapeError> {
        let url = self.page_url(query, page);
        debug!(%url, "requesting page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScrapeError::network(&url, &e))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScrapeError::network(&url, &e))?;

        Ok(RawPage {
            page,
            url,
            body: body.to_vec(),
        })
    }
}

// Builds the address of one results page
//
// The query is form-encoded, so spaces become '+':
//   ("https://host", "test query", 1) -> "https://host/test+query?page=1"
pub fn build_page_url(base_url: &str, query: &str, page: u32) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}/{}?page={}", base_url, encoded, page)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait (PageSource) for the fetcher?
//    - The orchestrator only needs "give me page N for this query"
//    - Tests can plug in a scripted source that never touches the network
//    - #[async_trait] is needed because the trait has an async method
//
// 2. Why form_urlencoded instead of plain percent-encoding?
//    - The listing site expects search terms encoded like a form field
//    - That encoding turns spaces into '+' ("test query" -> "test+query")
//
// 3. What does map_err do?
//    - Converts the error inside a Result into another error type
//    - Here: reqwest::Error -> ScrapeError::Network, so callers see one type
//
// 4. Why check status.is_success() ourselves?
//    - reqwest only fails on transport problems; a 404 or 500 is still an
//      Ok(response). We turn those into ScrapeError::HttpStatus
// -----------------------------------------------------------------------------
