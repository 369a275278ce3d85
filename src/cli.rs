// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - search: scrape the listing for a query and save the titles
// - serve: expose the same scrape as GET /scrape over HTTP
//
// The global options (--base-url, --timeout-secs, --page-delay-ms) can also
// come from environment variables, which is handy when running `serve` in a
// container.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    ScraperConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "listing-titles",
    version = "0.1.0",
    about = "Collect product titles from a listing site's search results",
    long_about = "listing-titles fetches search-result pages one by one, extracts the product titles \
                  and saves them, de-duplicated and in the order they were found."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base address of the listing site
    #[arg(long, global = true, env = "LISTING_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout, in seconds
    #[arg(long, global = true, env = "LISTING_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Pause between two pages, in milliseconds
    #[arg(long, global = true, env = "LISTING_PAGE_DELAY_MS", default_value_t = DEFAULT_PAGE_DELAY_MS)]
    pub page_delay_ms: u64,

    /// Log progress (info level) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig::new(&self.base_url, self.timeout_secs, self.page_delay_ms)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the titles for a search query
    ///
    /// Example: listing-titles search "notebook" 3
    Search {
        /// What to search for
        query: String,

        /// How many result pages to scrape
        #[arg(default_value_t = 1)]
        pages: u32,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Where to save the titles (default: titulos_<query>.txt)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Don't write the titles file
        #[arg(long, conflicts_with = "output")]
        no_save: bool,

        /// Save every fetched page body into this directory
        #[arg(long, value_name = "DIR")]
        dump_responses: Option<PathBuf>,
    },

    /// Serve GET /scrape?query=...&pages=... over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does global = true do?
//    - The option can be written before or after the subcommand:
//      `listing-titles --page-delay-ms 0 search x` or
//      `listing-titles search x --page-delay-ms 0`
//
// 2. What does env = "..." do?
//    - If the flag isn't given, clap reads the environment variable
//    - If neither is set, the default value is used
//
// 3. Why is `pages` a u32?
//    - Page numbers are never negative, so clap rejects "-1" for us
//    - Zero still parses; the orchestrator rejects it before any request
// -----------------------------------------------------------------------------
