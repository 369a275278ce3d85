// src/scrape/orchestrator.rs
// =============================================================================
// This module runs a whole scrape: pages 1..=N for one query.
//
// How it works:
// 1. Validate the invocation (non-blank query, at least one page)
// 2. For each page, in order:
//    - fetch the raw page
//    - hand it to the response observer, if one is installed
//    - extract the titles
//    - append every title the run hasn't seen yet
// 3. Pause between pages (never after the last one)
// 4. Return every title gathered plus one report per page
//
// Failure isolation:
// - A page that fails (network, HTTP status, extraction) is recorded as a
//   failed PageReport and the loop moves on to the next page
// - Only invocation errors come out of run() as Err
//
// Pages are deliberately fetched one at a time. The pause between them is
// what keeps our request rate polite, and running pages concurrently would
// defeat it.
// =============================================================================

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::scrape::extract::TitleExtractor;
use crate::scrape::fetch::{PageSource, RawPage};

// Upper bound on the report capacity reserved up front; the page count comes
// from callers and can be as large as u32::MAX
const INITIAL_REPORT_CAPACITY: u32 = 64;

// Titles gathered by one run, in first-seen order, each exactly once
//
// The HashSet mirrors the Vec so membership checks stay O(1) on long runs.
#[derive(Debug, Clone, Default)]
pub struct TitleCollection {
    titles: Vec<String>,
    seen: HashSet<String>,
}

impl TitleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the title unless the run already has it. Returns whether it was added.
    pub fn insert(&mut self, title: &str) -> bool {
        if self.seen.contains(title) {
            return false;
        }
        self.seen.insert(title.to_string());
        self.titles.push(title.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.titles
    }
}

// Serializes as a plain JSON array of titles
impl Serialize for TitleCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.titles)
    }
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Titles extracted from this page (before whole-run de-duplication)
    Success { titles: Vec<String>, new_titles: usize },
    Failure { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page: u32,
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, PageOutcome::Success { .. })
    }
}

// The result of a run: the merged titles plus the per-page diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub query: String,
    pub titles: TitleCollection,
    pub pages: Vec<PageReport>,
}

impl ScrapeReport {
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_ok()).count()
    }

    pub fn succeeded_pages(&self) -> usize {
        self.pages.len() - self.failed_pages()
    }
}

/// Hook that sees every fetched page body before extraction.
///
/// Errors returned here are logged and ignored; they never fail the page.
#[async_trait]
pub trait ResponseObserver: Send + Sync {
    async fn on_response(&self, page: &RawPage) -> Result<(), ScrapeError>;
}

// Writes each fetched body to {dir}/page-{n}.html for offline inspection
#[derive(Debug, Clone)]
pub struct ResponseDumpObserver {
    dir: PathBuf,
}

impl ResponseDumpObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ResponseObserver for ResponseDumpObserver {
    async fn on_response(&self, page: &RawPage) -> Result<(), ScrapeError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("page-{}.html", page.page));
        tokio::fs::write(&path, &page.body).await?;
        info!(page = page.page, url = %page.url, path = %path.display(), "response body saved");
        Ok(())
    }
}

pub struct ScrapeOrchestrator<S: PageSource> {
    source: S,
    extractor: Arc<TitleExtractor>,
    page_delay: Duration,
    observer: Option<Arc<dyn ResponseObserver>>,
}

impl<S: PageSource> ScrapeOrchestrator<S> {
    pub fn new(source: S, extractor: Arc<TitleExtractor>, page_delay: Duration) -> Self {
        Self {
            source,
            extractor,
            page_delay,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // Runs pages 1..=max_pages for the query
    //
    // The title collection lives only inside this call, so two runs never
    // share state even when they share an orchestrator.
    pub async fn run(&self, query: &str, max_pages: u32) -> Result<ScrapeReport, ScrapeError> {
        validate_invocation(query, max_pages)?;

        let mut titles = TitleCollection::new();
        let mut pages = Vec::with_capacity(max_pages.min(INITIAL_REPORT_CAPACITY) as usize);

        for page in 1..=max_pages {
            info!(page, max_pages, query, "scraping page");

            let outcome = match self.scrape_page(query, page).await {
                Ok(page_titles) => {
                    let mut new_titles = 0;
                    for title in &page_titles {
                        if titles.insert(title) {
                            new_titles += 1;
                        }
                    }
                    info!(page, found = page_titles.len(), new_titles, "page scraped");
                    PageOutcome::Success {
                        titles: page_titles,
                        new_titles,
                    }
                }
                Err(e) => {
                    warn!(page, error = %e, "page failed, continuing with the next one");
                    PageOutcome::Failure {
                        reason: e.to_string(),
                    }
                }
            };

            pages.push(PageReport {
                page,
                url: self.source.page_url(query, page),
                outcome,
            });

            if page < max_pages && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(ScrapeReport {
            query: query.to_string(),
            titles,
            pages,
        })
    }

    async fn scrape_page(&self, query: &str, page: u32) -> Result<Vec<String>, ScrapeError> {
        let raw = self.source.fetch(query, page).await?;

        if let Some(observer) = &self.observer {
            if let Err(e) = observer.on_response(&raw).await {
                warn!(page, error = %e, "response observer failed");
            }
        }

        Ok(self.extractor.extract(&raw))
    }
}

fn validate_invocation(query: &str, max_pages: u32) -> Result<(), ScrapeError> {
    if query.trim().is_empty() {
        return Err(ScrapeError::Invocation("a search query is required".to_string()));
    }
    if max_pages < 1 {
        return Err(ScrapeError::Invocation(
            "page count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
