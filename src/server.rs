// src/server.rs
// =============================================================================
// HTTP endpoint: GET /scrape?query=<text>&pages=<n>
//
// Each request gets its own orchestrator run and therefore its own title
// collection. The fetcher (and its connection pool), the compiled selectors
// and the config are shared read-only between requests.
//
// The endpoint never writes files. It only reports the filename the CLI
// would use for the same query.
// =============================================================================

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::output;
use crate::scrape::{PageFetcher, ScrapeOrchestrator, TitleExtractor};

#[derive(Clone)]
pub struct AppState {
    fetcher: PageFetcher,
    extractor: Arc<TitleExtractor>,
    page_delay: Duration,
}

impl AppState {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            extractor: Arc::new(TitleExtractor::new()?),
            page_delay: config.page_delay,
        })
    }
}

// `pages` stays a string here so a malformed count gets our JSON error reply
// instead of the extractor's plain-text rejection
#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    query: Option<String>,
    pages: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/scrape", get(scrape))
        .with_state(state)
}

/// Start the web server.
pub async fn serve(config: &ScraperConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(AppState::new(config)?);

    let listener = bind_listener(host, port).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

// Host names ("localhost") are resolved, not just IP literals
async fn bind_listener(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((host, port)).await
}

// Missing means one page; anything else must be a whole number in 1..=u32::MAX
fn parse_pages(raw: Option<&str>) -> Result<u32, ScrapeError> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    let count: i64 = raw.trim().parse().map_err(|_| {
        ScrapeError::Invocation(format!("page count must be a whole number, got '{}'", raw))
    })?;

    if count < 1 {
        return Err(ScrapeError::Invocation(
            "page count must be at least 1".to_string(),
        ));
    }

    u32::try_from(count).map_err(|_| {
        ScrapeError::Invocation(format!(
            "page count {} is too large (at most {})",
            count,
            u32::MAX
        ))
    })
}

async fn scrape(State(state): State<AppState>, Query(params): Query<ScrapeParams>) -> Response {
    let query = params.query.unwrap_or_default();

    let result = match parse_pages(params.pages.as_deref()) {
        Ok(pages) => {
            let orchestrator = ScrapeOrchestrator::new(
                state.fetcher.clone(),
                state.extractor.clone(),
                state.page_delay,
            );
            orchestrator.run(&query, pages).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => Json(serde_json::json!({
            "status": "success",
            "query": report.query,
            "total": report.titles.len(),
            "failed_pages": report.failed_pages(),
            "titles": report.titles,
            "file_saved": output::default_filename(&query),
            "pages": report.pages,
        }))
        .into_response(),
        Err(e) => {
            let status = if e.is_invocation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            tracing::warn!(error = %e, "scrape request rejected");
            (
                status,
                Json(serde_json::json!({
                    "status": "error",
                    "message": e.to_string(),
                    "pages": [],
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::test_support::{listing_html, spawn_listing_server};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn listing_state() -> AppState {
        let listing = Router::new().route(
            "/:query",
            get(|| async { listing_html(&["Portátil 14", "Portátil 15"]) }),
        );
        let base = spawn_listing_server(listing).await;
        AppState::new(&ScraperConfig::new(&base, 2, 0)).unwrap()
    }

    async fn call(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_scrape_success() {
        let (status, body) = call(listing_state().await, "/scrape?query=gaming%20laptop&pages=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["titles"], serde_json::json!(["Portátil 14", "Portátil 15"]));
        assert_eq!(body["total"], 2);
        assert_eq!(body["file_saved"], "titulos_gaming_laptop.txt");
        assert_eq!(body["pages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_pages_defaults_to_one() {
        let (status, body) = call(listing_state().await, "/scrape?query=notebook").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let (status, body) = call(listing_state().await, "/scrape?pages=2").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("query"));
    }

    #[tokio::test]
    async fn test_non_positive_pages_is_bad_request() {
        let state = listing_state().await;

        let (zero, _) = call(state.clone(), "/scrape?query=x&pages=0").await;
        let (negative, _) = call(state, "/scrape?query=x&pages=-3").await;

        assert_eq!(zero, StatusCode::BAD_REQUEST);
        assert_eq!(negative, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_pages_gets_json_error() {
        let (status, body) = call(listing_state().await, "/scrape?query=x&pages=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("whole number"));
        assert_eq!(body["pages"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_oversized_pages_rejected_before_scraping() {
        let state = listing_state().await;

        let (at_limit, body) = call(state.clone(), "/scrape?query=x&pages=4294967296").await;
        assert_eq!(at_limit, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("too large"));

        let (huge, body) = call(state, "/scrape?query=x&pages=99999999999").await;
        assert_eq!(huge, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("too large"));
    }

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_pages(None).unwrap(), 1);
        assert_eq!(parse_pages(Some("3")).unwrap(), 3);
        assert_eq!(parse_pages(Some("4294967295")).unwrap(), u32::MAX);
        assert!(parse_pages(Some("0")).unwrap_err().is_invocation());
        assert!(parse_pages(Some("-2")).unwrap_err().is_invocation());
        assert!(parse_pages(Some("2.5")).unwrap_err().is_invocation());
    }

    #[tokio::test]
    async fn test_bind_accepts_host_names() {
        let listener = bind_listener("localhost", 0).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
