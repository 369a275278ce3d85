// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results, save them, and exit with a proper code
//    (0 = done, 1 = every page failed, 2 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod output;
mod scrape;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use config::ScraperConfig;
use scrape::{
    PageFetcher, PageOutcome, ResponseDumpObserver, ScrapeOrchestrator, ScrapeReport,
    TitleExtractor,
};

// How many titles the summary shows, and how long each may be
const PREVIEW_COUNT: usize = 10;
const PREVIEW_WIDTH: usize = 80;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable.
// RUST_LOG overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "listing_titles=info"
    } else {
        "listing_titles=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = cli.scraper_config();

    match cli.command {
        Commands::Search {
            query,
            pages,
            json,
            output: output_path,
            no_save,
            dump_responses,
        } => {
            let save_to = if no_save {
                None
            } else {
                Some(output_path.unwrap_or_else(|| PathBuf::from(output::default_filename(&query))))
            };
            handle_search(&config, &query, pages, json, save_to, dump_responses).await
        }
        Commands::Serve { host, port } => {
            server::serve(&config, &host, port).await?;
            Ok(0)
        }
    }
}

// Handles the 'search' subcommand
async fn handle_search(
    config: &ScraperConfig,
    query: &str,
    pages: u32,
    json: bool,
    save_to: Option<PathBuf>,
    dump_responses: Option<PathBuf>,
) -> Result<i32> {
    let fetcher = PageFetcher::new(config)?;
    let extractor = Arc::new(TitleExtractor::new()?);
    let mut orchestrator = ScrapeOrchestrator::new(fetcher, extractor, config.page_delay);
    if let Some(dir) = dump_responses {
        orchestrator = orchestrator.with_observer(Arc::new(ResponseDumpObserver::new(dir)));
    }

    if !json {
        println!("🎯 Searching: '{}'", query);
        println!("📄 Pages: {}", pages);
        println!("{}", "-".repeat(40));
    }

    let report = orchestrator.run(query, pages).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(path) = save_to {
        output::write_titles(&path, report.titles.as_slice())
            .with_context(|| format!("could not save titles to {}", path.display()))?;
        if !json {
            println!("💾 Titles saved to: {}", path.display());
        }
    }

    if report.succeeded_pages() == 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints per-page results, the total, and a preview of the first titles
fn print_summary(report: &ScrapeReport) {
    for page in &report.pages {
        match &page.outcome {
            PageOutcome::Success { titles, new_titles } => println!(
                "🔍 Page {}: ✅ {} titles found ({} new)",
                page.page,
                titles.len(),
                new_titles
            ),
            PageOutcome::Failure { reason } => {
                println!("🔍 Page {}: ❌ {}", page.page, reason)
            }
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("🎉 TOTAL FOUND: {} titles", report.titles.len());
    println!("{}", "=".repeat(50));

    if report.titles.is_empty() {
        println!("\n⚠️  No titles found");
        return;
    }

    println!("\n📋 First titles found:");
    for (i, title) in report.titles.as_slice().iter().take(PREVIEW_COUNT).enumerate() {
        println!("   {}. {}", i + 1, preview(title));
    }

    if report.titles.len() > PREVIEW_COUNT {
        println!("   ... and {} more", report.titles.len() - PREVIEW_COUNT);
    }
    println!();
}

// Cuts a title to PREVIEW_WIDTH characters, marking the cut with "..."
fn preview(title: &str) -> String {
    if title.chars().count() > PREVIEW_WIDTH {
        let cut: String = title.chars().take(PREVIEW_WIDTH).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_keeps_short_titles() {
        assert_eq!(preview("Laptop A"), "Laptop A");
    }

    #[test]
    fn test_preview_truncates_on_characters() {
        let long = "é".repeat(90);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_WIDTH + 3);
        assert!(shown.ends_with("..."));
    }
}
