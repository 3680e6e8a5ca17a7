//! JSON storage for crawled articles.
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── sun_articles.json
//! ├── times_articles.json
//! ├── mail_articles.json
//! └── guardian_articles/
//!     ├── Guardian_page_1.json
//!     └── Guardian_page_2.json
//! ```

use crate::models::{GuardianPage, Outlet, RawArticle};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the article list for a search-page outlet.
pub fn articles_path(data_dir: &Path, outlet: Outlet) -> PathBuf {
    data_dir.join(format!("{}_articles.json", outlet.key()))
}

/// Write an outlet's articles as a JSON array.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub async fn write_articles(
    data_dir: &Path,
    outlet: Outlet,
    articles: &[RawArticle],
) -> Result<PathBuf, Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(data_dir).await {
        error!(dir = %data_dir.display(), error = %e, "Failed to create data dir");
        return Err(e.into());
    }
    let path = articles_path(data_dir, outlet);
    let json = serde_json::to_string_pretty(articles)?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote article JSON");
    Ok(path)
}

/// Write one Guardian API page to `{dir}/Guardian_page_{n}.json`.
#[instrument(level = "info", skip(page))]
pub async fn write_guardian_page(
    dir: &Path,
    page_number: u32,
    page: &GuardianPage,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(format!("Guardian_page_{page_number}.json"));
    let json = serde_json::to_string_pretty(page)?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), results = page.response.results.len(), "Wrote Guardian page");
    Ok(path)
}
