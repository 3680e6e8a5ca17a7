//! News source scrapers for collecting articles that match the search query.
//!
//! Each outlet follows the same two-phase pattern:
//!
//! 1. **Indexing**: Walk the outlet's search result pages and collect article links
//! 2. **Fetching**: Download and parse article content from each link
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | The Sun | [`search`] | HTML scraping | First result page has its own URL shape |
//! | The Times | [`search`] | HTML scraping | Relative links; Sep 2022 – Feb 2023 window |
//! | Daily Mail | [`search`] | HTML scraping | Offset paging; slug dedupe; needs a browser UA |
//! | The Guardian | [`guardian`] | Content API | Requires API key |
//!
//! Failed pages are logged and skipped without failing the crawl.

pub mod guardian;
pub mod links;
pub mod search;
pub mod selectors;

use crate::config::CrawlConfig;
use crate::error::PressError;
use crate::http::FetchAsync;
use crate::models::Outlet;
use crate::outputs::json::write_articles;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Crawl one outlet and store what was found under `data_dir`.
///
/// Returns the number of articles stored.
#[instrument(level = "info", skip(config, fetcher, guardian_api_key, data_dir))]
pub async fn crawl_outlet<F: FetchAsync>(
    outlet: Outlet,
    config: &CrawlConfig,
    fetcher: &F,
    guardian_api_key: Option<&str>,
    data_dir: &Path,
) -> Result<usize, Box<dyn Error>> {
    if outlet == Outlet::Guardian {
        return guardian::crawl(&config.guardian, &config.query, guardian_api_key, fetcher, data_dir).await;
    }

    let outlet_config = config
        .search_outlet(outlet)
        .ok_or_else(|| PressError::UnknownOutlet(outlet.key().to_string()))?;
    let articles = search::crawl(outlet_config, &config.query, config.concurrency, fetcher, data_dir).await?;
    let path = write_articles(data_dir, outlet, &articles).await?;
    info!(count = articles.len(), path = %path.display(), "Stored articles");
    Ok(articles.len())
}
