// src/scrape/mod.rs
// =============================================================================
// The scraping core.
//
// Submodules:
// - fetch: downloads one results page (PageFetcher, behind the PageSource trait)
// - extract: finds the product titles in a page (TitleExtractor)
// - orchestrator: runs pages 1..=N, merges titles, isolates page failures
//
// Callers (the CLI and the HTTP endpoint) only need what's re-exported here.
// =============================================================================

mod extract;
mod fetch;
mod orchestrator;

pub use extract::TitleExtractor;
pub use fetch::PageFetcher;
pub use orchestrator::{
    PageOutcome, ResponseDumpObserver, ScrapeOrchestrator, ScrapeReport,
};
