// src/scrape/extract.rs
// =============================================================================
// This module pulls product titles out of a results page.
//
// The listing site has used several markup shapes over time, so we keep an
// ordered list of CSS selectors, most specific first:
//   1. .ui-search-item__title
//   2. .ui-search-result__content-title
//   3. h2.ui-search-item__title
//   4. .ui-search-item__group__element .ui-search-item__title
//
// The FIRST selector that matches anything wins. Its matches are the page's
// titles and the remaining selectors are never tried. A page where nothing
// matches simply has no titles.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::error::ScrapeError;
use crate::scrape::fetch::RawPage;

pub const TITLE_SELECTORS: [&str; 4] = [
    ".ui-search-item__title",
    ".ui-search-result__content-title",
    "h2.ui-search-item__title",
    ".ui-search-item__group__element .ui-search-item__title",
];

// Compiled selectors, in priority order
//
// Selector::parse is not free, so we compile once and share the extractor
// between runs (it's read-only after construction).
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    selectors: Vec<Selector>,
}

impl TitleExtractor {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_selectors(&TITLE_SELECTORS)
    }

    /// Builds an extractor from a custom ordered selector list.
    pub fn with_selectors(patterns: &[&str]) -> Result<Self, ScrapeError> {
        let selectors = patterns
            .iter()
            .map(|pattern| {
                Selector::parse(pattern).map_err(|e| {
                    ScrapeError::Extraction(format!("invalid selector '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { selectors })
    }

    pub fn extract(&self, page: &RawPage) -> Vec<String> {
        let html = String::from_utf8_lossy(&page.body);
        self.extract_html(&html)
    }

    // Returns the titles matched by the first selector that matches anything
    //
    // Within the page, each title is kept once, in document order.
    pub fn extract_html(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        for selector in &self.selectors {
            let mut elements = document.select(selector).peekable();
            if elements.peek().is_none() {
                continue;
            }

            let mut seen = HashSet::new();
            let mut titles = Vec::new();
            for element in elements {
                // Join the text nodes as-is and trim only the ends, so inline
                // markup keeps its spacing: "Silla <b>Ergonómica</b>" -> "Silla Ergonómica"
                let text = element.text().collect::<String>();
                let title = text.trim();
                if !title.is_empty() && seen.insert(title.to_string()) {
                    titles.push(title.to_string());
                }
            }
            return titles;
        }

        Vec::new()
    }
}
